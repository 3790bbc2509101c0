//! SpaceAPI document assembly
//!
//! A [`SpaceRecord`] is built fresh for every request by walking the option
//! registry in order and copying the stored values:
//!
//! - `address`, `lat` and `lon` are nested under a `location` object, placed
//!   where the first of them appears in the registry
//! - `issue_report_channels` is split on `,` into an array
//! - everything else is emitted as a string under its own key
//!
//! Options that were never stored are left out. Values are kept raw; the
//! JSON encoder does its own escaping.

use crate::error::Result;
use crate::registry::OptionRegistry;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use spaceapi_store::SettingsStore;

/// Keys grouped under the `location` object
pub const LOCATION_KEYS: [&str; 3] = ["address", "lat", "lon"];

/// Key of the nested location object
pub const LOCATION_FIELD: &str = "location";

/// Key whose stored value is a comma separated list
pub const CHANNELS_KEY: &str = "issue_report_channels";

/// A value in the SpaceAPI document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
    /// Ordered string members of a nested object
    Object(Vec<(String, String)>),
}

/// The SpaceAPI document, with fields in registry order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpaceRecord {
    fields: Vec<(String, FieldValue)>,
}

impl SpaceRecord {
    /// Read every option from `store` and assemble the document
    pub async fn build(registry: &OptionRegistry, store: &dyn SettingsStore) -> Result<Self> {
        let mut values = Vec::with_capacity(registry.len());
        for descriptor in registry.iter() {
            let value = store.get(&descriptor.storage_name).await?;
            values.push((descriptor.key.clone(), value));
        }
        Ok(Self::from_values(values))
    }

    /// Assemble from `(key, stored value)` pairs already in registry order
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        let mut record = Self::default();

        for (key, value) in values {
            let Some(value) = value else {
                continue;
            };

            if LOCATION_KEYS.contains(&key.as_str()) {
                record.push_location(key, value);
            } else if key == CHANNELS_KEY {
                record.fields.push((key, FieldValue::List(split_channels(&value))));
            } else {
                record.fields.push((key, FieldValue::Scalar(value)));
            }
        }

        record
    }

    fn push_location(&mut self, key: String, value: String) {
        for (name, field) in &mut self.fields {
            if let (LOCATION_FIELD, FieldValue::Object(members)) = (name.as_str(), field) {
                members.push((key, value));
                return;
            }
        }
        self.fields.push((
            LOCATION_FIELD.to_string(),
            FieldValue::Object(vec![(key, value)]),
        ));
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Top-level keys in output order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Compact JSON encoding
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Split the stored channel list. An empty value yields an empty list.
pub fn split_channels(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(str::to_string).collect()
}

impl Serialize for SpaceRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldValue::Scalar(value) => serializer.serialize_str(value),
            FieldValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FieldValue::Object(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (key, value) in members {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spaceapi_store::MemorySettingsStore;

    fn scenario_store(registry: &OptionRegistry) -> MemorySettingsStore {
        MemorySettingsStore::with_values([
            (registry.storage_name("api"), "0.13"),
            (registry.storage_name("space"), "Test Space"),
            (registry.storage_name("address"), "1 Main St"),
            (registry.storage_name("lat"), "1.0"),
            (registry.storage_name("lon"), "2.0"),
            (registry.storage_name("issue_report_channels"), "email,irc"),
        ])
    }

    #[tokio::test]
    async fn test_scenario_document() {
        let registry = OptionRegistry::default();
        let store = scenario_store(&registry);

        let record = SpaceRecord::build(&registry, &store).await.unwrap();

        assert_eq!(
            record.to_json().unwrap(),
            r#"{"api":"0.13","space":"Test Space","location":{"address":"1 Main St","lat":"1.0","lon":"2.0"},"issue_report_channels":["email","irc"]}"#
        );
    }

    #[tokio::test]
    async fn test_location_keys_not_top_level() {
        let registry = OptionRegistry::default();
        let store = scenario_store(&registry);
        store.set(&registry.storage_name("logo"), "logo.png").await.unwrap();
        store.set(&registry.storage_name("url"), "https://example.org").await.unwrap();

        let record = SpaceRecord::build(&registry, &store).await.unwrap();

        let keys: Vec<_> = record.keys().collect();
        assert_eq!(
            keys,
            vec!["api", "space", "logo", "url", "location", "issue_report_channels"]
        );
        for key in LOCATION_KEYS {
            assert!(record.get(key).is_none());
        }
    }

    #[test]
    fn test_single_channel_is_list() {
        let record = SpaceRecord::from_values([(CHANNELS_KEY.to_string(), Some("email".to_string()))]);
        assert_eq!(
            record.get(CHANNELS_KEY),
            Some(&FieldValue::List(vec!["email".to_string()]))
        );
    }

    #[test]
    fn test_empty_channels_is_empty_list() {
        let record = SpaceRecord::from_values([(CHANNELS_KEY.to_string(), Some(String::new()))]);
        assert_eq!(record.to_json().unwrap(), r#"{"issue_report_channels":[]}"#);
    }

    #[test]
    fn test_channels_split_literally() {
        assert_eq!(split_channels("a,,b"), vec!["a", "", "b"]);
        assert_eq!(split_channels(" irc , email"), vec![" irc ", " email"]);
    }

    #[test]
    fn test_stored_empty_scalar_is_kept() {
        let record = SpaceRecord::from_values([
            ("api".to_string(), Some(String::new())),
            ("space".to_string(), None),
        ]);
        assert_eq!(record.to_json().unwrap(), r#"{"api":""}"#);
    }

    #[test]
    fn test_values_are_not_html_escaped() {
        let record = SpaceRecord::from_values([(
            "space".to_string(),
            Some("Hack & <Make> \"Space\"".to_string()),
        )]);
        assert_eq!(
            record.to_json().unwrap(),
            r#"{"space":"Hack & <Make> \"Space\""}"#
        );
    }

    #[tokio::test]
    async fn test_repeated_builds_are_identical() {
        let registry = OptionRegistry::default();
        let store = scenario_store(&registry);

        let first = SpaceRecord::build(&registry, &store).await.unwrap().to_json().unwrap();
        let second = SpaceRecord::build(&registry, &store).await.unwrap().to_json().unwrap();
        assert_eq!(first, second);
    }
}
