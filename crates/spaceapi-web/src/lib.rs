//! spaceapi-web: Routes for the SpaceAPI server
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    spaceapi-service (:8080)                   │
//! ├──────────────────────────────────────────────────────────────┤
//! │  /spaceapi/v1/index  - SpaceAPI JSON document                 │
//! │  /spaceapi/...       - anything else redirects to home_url    │
//! │  /admin/settings     - settings form (GET) and save (POST)    │
//! │  /api/health         - Health check                           │
//! │  /                   - Static files or 404                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The SpaceAPI endpoint is a layer over the whole router: it answers every
//! path under `/spaceapi` and passes everything else through untouched.

pub mod admin;
pub mod error;
pub mod health;
pub mod spaceapi;
pub mod state;

pub use error::WebError;
pub use state::AppState;

use axum::Router;
use spaceapi_core::DEFAULT_SETTINGS_PAGE;
use spaceapi_http::RouterBuilder;
use std::path::PathBuf;
use std::sync::Arc;

/// Site-level settings for the web routes
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Where failed SpaceAPI lookups are redirected
    pub home_url: String,
    /// Settings page id, shown in the admin form
    pub settings_page: String,
    /// Password for the `admin` user; `None` leaves the admin page open
    pub admin_password: Option<String>,
    /// Directory served for paths no route claims
    pub static_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            home_url: "/".to_string(),
            settings_page: DEFAULT_SETTINGS_PAGE.to_string(),
            admin_password: None,
            static_dir: None,
        }
    }
}

/// Create the complete application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut builder = RouterBuilder::new()
        .nest("/admin", "admin", admin::create_admin_router(state.clone()))
        .nest("/api", "api", health::create_api_router(state.clone()));

    if let Some(dir) = &state.config.static_dir {
        builder = builder.static_dir(dir.clone());
    }

    builder.build().layer(axum::middleware::from_fn_with_state(
        state,
        spaceapi::spaceapi_middleware,
    ))
}
