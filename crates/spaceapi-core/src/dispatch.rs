//! Request Dispatcher
//!
//! Maps the path fragment that follows `/spaceapi` to an outcome. The
//! surface is a flat two-level router: a version token, then an action.
//!
//! ```text
//! None             → PassThrough   (request is not for us)
//! ""               → Redirect
//! "<v>/..."        → Redirect      unless v == "v1"
//! "v1"             → Json          (action defaults to "index")
//! "v1/index/..."   → Json
//! "v1/<other>"     → Redirect
//! ```
//!
//! Every failure degrades to a redirect to the site root, never an error
//! status.

use crate::record::SpaceRecord;
use crate::registry::OptionRegistry;
use spaceapi_store::SettingsStore;
use std::sync::Arc;
use tracing::{debug, error};

/// The only supported API version token
pub const API_VERSION: &str = "v1";

/// Action used when the fragment names a version only
pub const DEFAULT_ACTION: &str = "index";

/// Routing decision for a path fragment, before any store access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    PassThrough,
    Redirect,
    Index,
}

/// Decide what a fragment addresses.
pub fn route(fragment: Option<&str>) -> Route {
    let Some(fragment) = fragment else {
        return Route::PassThrough;
    };
    if fragment.is_empty() {
        return Route::Redirect;
    }

    let mut parts = fragment.split('/');
    // Strict equality: no prefix or semver matching.
    if parts.next() != Some(API_VERSION) {
        return Route::Redirect;
    }

    match parts.next().unwrap_or(DEFAULT_ACTION) {
        DEFAULT_ACTION => Route::Index,
        _ => Route::Redirect,
    }
}

/// Final outcome of a dispatched request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Not addressed to the SpaceAPI endpoint; let the host handle it
    PassThrough,
    /// Send the client to the site root
    Redirect,
    /// Emit the document and finish the request
    Json(SpaceRecord),
}

/// Resolves fragments against a registry and its backing store
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<OptionRegistry>,
    store: Arc<dyn SettingsStore>,
}

impl Dispatcher {
    pub fn new(registry: Arc<OptionRegistry>, store: Arc<dyn SettingsStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, fragment: Option<&str>) -> Dispatch {
        match route(fragment) {
            Route::PassThrough => Dispatch::PassThrough,
            Route::Redirect => {
                debug!("SpaceAPI fragment {:?} redirects to site root", fragment);
                Dispatch::Redirect
            }
            Route::Index => match SpaceRecord::build(&self.registry, self.store.as_ref()).await {
                Ok(record) => Dispatch::Json(record),
                Err(e) => {
                    error!("Failed to read SpaceAPI settings: {}", e);
                    Dispatch::Redirect
                }
            },
        }
    }
}
