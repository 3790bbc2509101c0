//! spaceapi-http: HTTP Server
//!
//! Owns listening, graceful shutdown and the shared middleware stack.
//! Route definitions live in `spaceapi-web` and are composed here.
//!
//! Architecture:
//! ```text
//! spaceapi-service binary
//!     └── spaceapi-http (this crate)
//!         ├── Middleware stack (CORS, tracing, compression, timeout)
//!         └── Router composition
//!             ├── /spaceapi/*       → SpaceAPI document
//!             ├── /admin/settings   → settings form
//!             ├── /api/health       → health check
//!             └── /*                → static files or 404
//! ```

pub mod middleware;
pub mod router;
pub mod server;

// Re-export main types
pub use middleware::{MiddlewareConfig, MiddlewareStack};
pub use router::RouterBuilder;
pub use server::{shutdown_signal, HttpServer, HttpServerBuilder, ServerConfig};

// Re-export axum for convenience
pub use axum;

/// Error types for the HTTP server
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Server binding error: {0}")]
    BindError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
