//! Application State
//!
//! Shared by every handler. The registry is built once at startup and only
//! read afterwards; the store is the single mutable resource.

use spaceapi_core::{Dispatcher, OptionRegistry};
use spaceapi_store::SettingsStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::WebConfig;

pub struct AppState {
    pub registry: Arc<OptionRegistry>,
    pub store: Arc<dyn SettingsStore>,
    pub dispatcher: Dispatcher,
    pub config: WebConfig,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        registry: Arc<OptionRegistry>,
        store: Arc<dyn SettingsStore>,
        config: WebConfig,
    ) -> Self {
        info!(
            "Application state ready: {} options in section '{}'",
            registry.len(),
            registry.section()
        );

        let dispatcher = Dispatcher::new(registry.clone(), store.clone());
        Self {
            registry,
            store,
            dispatcher,
            config,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
