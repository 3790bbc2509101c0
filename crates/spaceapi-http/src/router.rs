//! Router Composition
//!
//! Collects the routers exported by `spaceapi-web` into one application
//! router and decides what answers requests nobody else claimed.

use axum::{http::StatusCode, Router};
use std::path::PathBuf;
use tower_http::services::ServeDir;
use tracing::info;

/// Builder for composing service routers
pub struct RouterBuilder {
    router: Router,
    static_dir: Option<PathBuf>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            static_dir: None,
        }
    }

    /// Add a router at a specific prefix
    pub fn nest(mut self, prefix: &'static str, name: &'static str, router: Router) -> Self {
        info!("Mounting service '{}' at {}", name, prefix);
        self.router = self.router.nest(prefix, router);
        self
    }

    /// Set static file directory (served at root, fallback)
    pub fn static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    /// Build the final router.
    ///
    /// Unclaimed paths go to the static directory when one is configured and
    /// exists, otherwise they get a bare `404 Not Found`.
    pub fn build(self) -> Router {
        if let Some(static_dir) = self.static_dir {
            if static_dir.exists() {
                info!("Serving static files from: {:?}", static_dir);
                return self.router.fallback_service(ServeDir::new(static_dir));
            }
            tracing::warn!("Static directory not found: {:?}", static_dir);
        }

        self.router.fallback(|| async { StatusCode::NOT_FOUND })
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
