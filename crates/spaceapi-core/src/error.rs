//! Error types for the SpaceAPI core

use spaceapi_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Duplicate option key: {0}")]
    DuplicateKey(String),

    #[error("Option key must not be empty")]
    EmptyKey,

    #[error("Unknown option key: {0}")]
    UnknownKey(String),

    #[error("Settings store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
