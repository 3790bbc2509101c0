//! Option Registry
//!
//! The single source of truth mapping abstract setting keys to storage
//! names, admin labels and field renderers. The registry is built once at
//! startup and never mutated afterwards; iteration order is insertion order
//! and drives both the admin form layout and the JSON key order.

use crate::error::{Error, Result};
use serde::Serialize;
use spaceapi_store::SettingsStore;
use std::collections::HashSet;

/// Settings page id used by the admin UI
pub const DEFAULT_SETTINGS_PAGE: &str = "spaceapi-wp-settings";

/// Settings section id; prefixes every storage name
pub const DEFAULT_SETTINGS_SECTION: &str = "spaceapi-wp-settings-section";

/// How the admin page renders the input for an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRenderer {
    /// Single-line free text
    Text,
    /// Absolute URL
    Url,
    /// Decimal latitude or longitude
    Coordinate,
    /// Comma separated list, stored as one string
    CommaList,
}

/// Static description of one option, before the section prefix is applied
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub renderer: FieldRenderer,
}

impl OptionSpec {
    pub const fn new(key: &'static str, label: &'static str, renderer: FieldRenderer) -> Self {
        Self {
            key,
            label,
            renderer,
        }
    }
}

/// The SpaceAPI fields the service exposes, in output order
pub const SPACEAPI_OPTIONS: &[OptionSpec] = &[
    OptionSpec::new("api", "SpaceAPI Api Version", FieldRenderer::Text),
    OptionSpec::new("space", "Name of HackSpace", FieldRenderer::Text),
    OptionSpec::new("logo", "Image for the HackSpace", FieldRenderer::Url),
    OptionSpec::new("url", "Web Address for the HackSpace", FieldRenderer::Url),
    OptionSpec::new("address", "Address for the HackSpace", FieldRenderer::Text),
    OptionSpec::new("lat", "Latitude for the HackSpace", FieldRenderer::Coordinate),
    OptionSpec::new("lon", "Longitude for the HackSpace", FieldRenderer::Coordinate),
    OptionSpec::new(
        "issue_report_channels",
        "List of channels to report issues, comma separated",
        FieldRenderer::CommaList,
    ),
];

/// One entry in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionDescriptor {
    pub key: String,
    pub storage_name: String,
    pub label: String,
    pub renderer: FieldRenderer,
}

impl OptionDescriptor {
    fn from_spec(section: &str, spec: &OptionSpec) -> Self {
        Self {
            key: spec.key.to_string(),
            storage_name: format!("{}-{}", section, spec.key),
            label: spec.label.to_string(),
            renderer: spec.renderer,
        }
    }
}

/// Ordered, immutable set of option descriptors sharing one settings section
#[derive(Debug, Clone)]
pub struct OptionRegistry {
    section: String,
    descriptors: Vec<OptionDescriptor>,
}

impl OptionRegistry {
    /// Build a registry, rejecting empty and duplicate keys
    pub fn new<'a, I>(section: impl Into<String>, specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a OptionSpec>,
    {
        let section = section.into();
        let mut seen = HashSet::new();
        let mut descriptors = Vec::new();

        for spec in specs {
            if spec.key.is_empty() {
                return Err(Error::EmptyKey);
            }
            if !seen.insert(spec.key) {
                return Err(Error::DuplicateKey(spec.key.to_string()));
            }
            descriptors.push(OptionDescriptor::from_spec(&section, spec));
        }

        Ok(Self {
            section,
            descriptors,
        })
    }

    /// Registry holding the standard SpaceAPI fields
    pub fn spaceapi_default(section: impl Into<String>) -> Self {
        let section = section.into();
        let descriptors = SPACEAPI_OPTIONS
            .iter()
            .map(|spec| OptionDescriptor::from_spec(&section, spec))
            .collect();

        Self {
            section,
            descriptors,
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn describe(&self, key: &str) -> Option<&OptionDescriptor> {
        self.descriptors.iter().find(|d| d.key == key)
    }

    /// Storage name for `key`, or an empty string when the key is unknown
    pub fn storage_name(&self, key: &str) -> String {
        self.describe(key)
            .map(|d| d.storage_name.clone())
            .unwrap_or_default()
    }

    /// Raw stored value for `key`.
    ///
    /// Unknown keys and values never written both read as an empty string.
    /// The result is unescaped; callers embedding it in HTML escape it there.
    pub async fn current_value(&self, store: &dyn SettingsStore, key: &str) -> Result<String> {
        match self.describe(key) {
            Some(descriptor) => Ok(store
                .get(&descriptor.storage_name)
                .await?
                .unwrap_or_default()),
            None => Ok(String::new()),
        }
    }

    /// Persist `value` under the storage name of `key`
    pub async fn store_value(&self, store: &dyn SettingsStore, key: &str, value: &str) -> Result<()> {
        let descriptor = self
            .describe(key)
            .ok_or_else(|| Error::UnknownKey(key.to_string()))?;
        store.set(&descriptor.storage_name, value).await?;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDescriptor> {
        self.descriptors.iter()
    }

    pub fn storage_names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.storage_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for OptionRegistry {
    fn default() -> Self {
        Self::spaceapi_default(DEFAULT_SETTINGS_SECTION)
    }
}
