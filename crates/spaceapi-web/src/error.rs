use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use spaceapi_store::StoreError;
use thiserror::Error;
use tracing::error;

/// Failures of the admin routes. The SpaceAPI endpoint never returns these.
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Settings error: {0}")]
    Core(#[from] spaceapi_core::Error),
    #[error("Settings store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        error!("Admin request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Settings could not be read or saved",
        )
            .into_response()
    }
}
