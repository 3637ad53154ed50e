//! The persisted resolution record.
//!
//! Read once when the engine starts, mutated in place, and written back after
//! a rescan, after the startup language decision, and after every language
//! switch. Any missing field reads as absent or `false`, which makes the
//! record stale and triggers a rescan instead of an error.

use crate::storage::Storage;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolyConfig {
    /// Engine version that wrote the record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poly_version: Option<String>,

    /// App build that wrote the record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,

    /// Supported language codes, without file extension, in scan order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,

    /// Whether translations are read from the bundled-asset area
    pub is_using_fallback: bool,

    /// Device language code observed on the previous run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sys_lang_code: Option<String>,

    /// Language chosen on the previous run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl PolyConfig {
    /// Load the record. A missing or corrupt file yields an empty record.
    pub fn load<S: Storage + ?Sized>(storage: &S, path: &str) -> Self {
        let Some(value) = storage.read_json(path) else {
            return Self::default();
        };

        match serde_json::from_value(value) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring corrupt poly config at {}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &S, path: &str) {
        match serde_json::to_value(self) {
            Ok(value) => storage.write_json(path, &value),
            Err(e) => warn!("Failed to serialize poly config: {}", e),
        }
    }

    /// True when the record was written by a different engine or app build,
    /// or was never written at all.
    pub fn is_stale(&self, poly_version: &str, app_version: &str) -> bool {
        self.poly_version.as_deref() != Some(poly_version)
            || self.app_version.as_deref() != Some(app_version)
    }

    /// Record the running build's versions.
    pub fn stamp(&mut self, poly_version: &str, app_version: &str) {
        self.poly_version = Some(poly_version.to_string());
        self.app_version = Some(app_version.to_string());
    }
}
