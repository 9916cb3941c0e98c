//! Driver attributes supplied by the host application.
//!
//! Attributes are associated with a driver id at SDK initialization time and
//! consumed read-only by the detection engine at drive start. Every setter
//! returns a synchronous success flag; rejected input is a no-op that leaves
//! the previous value in place. Setters are not thread-safe; a host sharing
//! one instance across threads must serialize access itself.

use crate::validation::{is_valid_input_parameter, InputPolicy};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key for the group id in exported attributes.
pub const KEY_GROUP: &str = "group";
/// Key for the service level in exported attributes.
pub const KEY_SERVICE_LEVEL: &str = "service_level";
/// Key for the driver alias in exported attributes.
pub const KEY_ALIAS: &str = "alias";

/// Export keys that custom attributes may not shadow.
const RESERVED_KEYS: [&str; 3] = [KEY_GROUP, KEY_SERVICE_LEVEL, KEY_ALIAS];

/// Maximum number of custom attributes per driver.
pub const MAX_CUSTOM_ATTRIBUTES: usize = 4;
/// Maximum custom-attribute key length in characters.
pub const MAX_KEY_LENGTH: usize = 64;
/// Maximum custom-attribute value length in characters.
pub const MAX_VALUE_LENGTH: usize = 1024;

/// Service tier of a driver.
///
/// Multi-tier support is provisioned per deployment. When it is not enabled,
/// the engine maps every driver to the default level regardless of the value
/// set here; that downgrade happens engine-side and is not enforced by this
/// type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceLevel {
    #[default]
    Default,
    Level1,
}

impl ServiceLevel {
    /// Integer code used in exported attributes.
    pub fn code(self) -> i64 {
        match self {
            ServiceLevel::Default => 0,
            ServiceLevel::Level1 => 1,
        }
    }
}

/// Additional attributes of a driver.
///
/// Up to [`MAX_CUSTOM_ATTRIBUTES`] custom key/value pairs can be attached in
/// addition to the predefined group, service level and alias.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverAttributes {
    group: Option<String>,
    service_level: ServiceLevel,
    alias: Option<String>,
    custom: BTreeMap<String, String>,
}

impl DriverAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate the driver with a group, e.g. a fleet or region name made
    /// available as a filter in reports.
    ///
    /// The id must pass the default input policy. Invalid input is rejected:
    /// returns `false`, logs a warning, and the previous group is retained.
    pub fn set_group(&mut self, group_id: &str) -> bool {
        if !is_valid_input_parameter(group_id) {
            tracing::warn!("rejected invalid group id");
            return false;
        }
        self.group = Some(group_id.to_string());
        true
    }

    /// [`set_group`](Self::set_group) with a host-supplied validity policy.
    pub fn set_group_with_policy(&mut self, policy: &dyn InputPolicy, group_id: &str) -> bool {
        if !policy.is_valid(group_id) {
            tracing::warn!("rejected invalid group id");
            return false;
        }
        self.group = Some(group_id.to_string());
        true
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Set the service tier. Always succeeds locally; see [`ServiceLevel`]
    /// for the engine-side downgrade behavior.
    pub fn set_service_level(&mut self, level: ServiceLevel) -> bool {
        self.service_level = level;
        true
    }

    pub fn service_level(&self) -> ServiceLevel {
        self.service_level
    }

    /// Set the alias, a free-form placeholder for referencing a driver.
    /// Pure assignment; always succeeds.
    pub fn set_alias(&mut self, alias: &str) -> bool {
        self.alias = Some(alias.to_string());
        true
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Set a custom attribute.
    ///
    /// Rejected (returns `false`, no mutation) when:
    /// - the key is longer than [`MAX_KEY_LENGTH`] characters,
    /// - the key shadows a reserved export key,
    /// - the value is longer than [`MAX_VALUE_LENGTH`] characters (for an
    ///   existing key the previous value is retained),
    /// - the key is new and [`MAX_CUSTOM_ATTRIBUTES`] entries already exist.
    pub fn set_custom_attribute(&mut self, key: &str, value: &str) -> bool {
        if key.chars().count() > MAX_KEY_LENGTH || key.is_empty() {
            tracing::warn!("rejected custom attribute: invalid key length");
            return false;
        }
        if RESERVED_KEYS.contains(&key) {
            tracing::warn!(key, "rejected custom attribute: reserved key");
            return false;
        }
        if value.chars().count() > MAX_VALUE_LENGTH {
            // For an existing key this keeps the previous value in place.
            tracing::warn!(key, "rejected custom attribute: value too long");
            return false;
        }
        if !self.custom.contains_key(key) && self.custom.len() >= MAX_CUSTOM_ATTRIBUTES {
            tracing::warn!(key, "rejected custom attribute: limit reached");
            return false;
        }
        self.custom.insert(key.to_string(), value.to_string());
        true
    }

    pub fn custom_attribute(&self, key: &str) -> Option<&str> {
        self.custom.get(key).map(String::as_str)
    }

    pub fn custom_attributes(&self) -> &BTreeMap<String, String> {
        &self.custom
    }

    /// Export the attributes as a flat dictionary.
    ///
    /// Contains `group` and `alias` when set, `service_level` always
    /// (integer-coded), and the custom pairs in key order. Always succeeds.
    pub fn as_dictionary(&self) -> Map<String, Value> {
        let mut dict = Map::new();
        if let Some(group) = &self.group {
            dict.insert(KEY_GROUP.to_string(), Value::from(group.clone()));
        }
        dict.insert(
            KEY_SERVICE_LEVEL.to_string(),
            Value::from(self.service_level.code()),
        );
        if let Some(alias) = &self.alias {
            dict.insert(KEY_ALIAS.to_string(), Value::from(alias.clone()));
        }
        for (key, value) in &self.custom {
            dict.insert(key.clone(), Value::from(value.clone()));
        }
        dict
    }

    /// Export the attributes as a JSON string.
    ///
    /// Deterministic for identical state: the serialization of
    /// [`as_dictionary`](Self::as_dictionary). A serialization failure is an
    /// `Err`, never an empty string, so it stays distinguishable from
    /// legitimately empty attributes.
    pub fn as_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Value::Object(self.as_dictionary()))
    }
}
