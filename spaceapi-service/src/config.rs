//! Service Configuration
//!
//! Resolution order, later wins:
//! 1. built-in defaults
//! 2. config file (`--config`, else the first of [`CONFIG_PATHS`] that exists)
//! 3. `SPACEAPI_*` environment variables
//! 4. command-line flags (applied in `main`)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use spaceapi_core::{OptionRegistry, DEFAULT_SETTINGS_PAGE, DEFAULT_SETTINGS_SECTION};
use spaceapi_web::WebConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Config files checked when no path is given (in order of priority)
pub const CONFIG_PATHS: &[&str] = &["/etc/spaceapi/spaceapi.toml", "spaceapi.toml"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listen address, `host:port`
    pub bind: String,
    /// Hostname shown in startup logs
    pub public_host: Option<String>,
    /// SQLx database URL for the settings store
    pub database_url: String,
    /// Redirect target for SpaceAPI paths that do not resolve
    pub home_url: String,
    pub settings_page: String,
    /// Prefix of every storage name
    pub settings_section: String,
    /// Enables Basic auth on the admin page
    pub admin_password: Option<String>,
    pub static_dir: Option<PathBuf>,
    pub cors: bool,
    /// Allowed CORS origins; `None` allows any
    pub cors_origins: Option<Vec<String>>,
    pub compression: bool,
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            public_host: None,
            database_url: "sqlite://spaceapi.db?mode=rwc".to_string(),
            home_url: "/".to_string(),
            settings_page: DEFAULT_SETTINGS_PAGE.to_string(),
            settings_section: DEFAULT_SETTINGS_SECTION.to_string(),
            admin_password: None,
            static_dir: None,
            cors: true,
            cors_origins: None,
            compression: true,
            request_timeout_secs: 30,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML or JSON file (chosen by extension)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = if path.extension().map(|e| e == "json").unwrap_or(false) {
            serde_json::from_str(&content).with_context(|| "Failed to parse JSON config")?
        } else {
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?
        };

        info!("Loaded service config from {}", path.display());
        Ok(config)
    }

    /// Load the first config file found in [`CONFIG_PATHS`], or defaults
    pub fn load_default() -> Result<Self> {
        for path in CONFIG_PATHS {
            if Path::new(path).exists() {
                return Self::load(path);
            }
        }

        info!("No service config found, using defaults");
        Ok(Self::default())
    }

    /// Apply `SPACEAPI_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable source; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(bind) = get("SPACEAPI_BIND") {
            debug!("SPACEAPI_BIND overrides bind address");
            self.bind = bind;
        }
        if let Some(url) = get("SPACEAPI_DATABASE_URL") {
            debug!("SPACEAPI_DATABASE_URL overrides database URL");
            self.database_url = url;
        }
        if let Some(home) = get("SPACEAPI_HOME_URL") {
            self.home_url = home;
        }
        if let Some(password) = get("SPACEAPI_ADMIN_PASSWORD") {
            debug!("SPACEAPI_ADMIN_PASSWORD set: ***");
            self.admin_password = Some(password);
        }
        if let Some(dir) = get("SPACEAPI_STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn registry(&self) -> OptionRegistry {
        OptionRegistry::spaceapi_default(self.settings_section.clone())
    }

    pub fn web_config(&self) -> WebConfig {
        WebConfig {
            home_url: self.home_url.clone(),
            settings_page: self.settings_page.clone(),
            admin_password: self.admin_password.clone(),
            static_dir: self.static_dir.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
