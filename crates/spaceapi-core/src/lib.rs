//! Core types for the SpaceAPI server
//!
//! # Modules
//!
//! - `registry`: Ordered table of configurable options and their storage names
//! - `record`: The SpaceAPI document assembled from stored option values
//! - `dispatch`: Maps a `/spaceapi/...` path fragment to JSON or a redirect
//! - `error`: Error types and Result alias

pub mod dispatch;
pub mod error;
pub mod record;
pub mod registry;

// Re-exports
pub use dispatch::{route, Dispatch, Dispatcher, Route, API_VERSION, DEFAULT_ACTION};
pub use error::{Error, Result};
pub use record::{FieldValue, SpaceRecord};
pub use registry::{
    FieldRenderer, OptionDescriptor, OptionRegistry, OptionSpec, DEFAULT_SETTINGS_PAGE,
    DEFAULT_SETTINGS_SECTION, SPACEAPI_OPTIONS,
};
