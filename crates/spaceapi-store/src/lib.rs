//! SpaceAPI Settings Store
//!
//! Key/value persistence for the values edited on the admin settings page.
//! Values are addressed by their storage name (`{section}-{key}`) and are
//! always plain strings.
//!
//! Backends:
//! - SQLite persistent storage (`SqliteSettingsStore`)
//! - In-process map for tests and ephemeral runs (`MemorySettingsStore`)

pub mod error;
pub mod memory_store;
pub mod settings_store;
pub mod sqlite_store;

pub use error::{Result, StoreError};
pub use memory_store::MemorySettingsStore;
pub use settings_store::SettingsStore;
pub use sqlite_store::SqliteSettingsStore;
