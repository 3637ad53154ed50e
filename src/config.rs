use anyhow::{Context, Result};
use std::path::PathBuf;

/// Version of the resolution engine. A persisted record written by a different
/// version is treated as stale and triggers a rescan of translation files.
pub const POLY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound for a bundled-asset read (128 KiB).
pub const DEFAULT_ASSET_READ_LIMIT: usize = 131_072;

/// Catalog id of `en-US`, used when the device does not report a language.
pub const DEFAULT_SYSTEM_LANGUAGE_ID: u32 = 2;

#[derive(Debug, Clone)]
pub struct Config {
    // Versions (guard for the persisted record)
    pub poly_version: String,
    pub app_version: String,

    // Language defaults
    pub default_language: String,
    pub system_language_id: u32,

    // Storage roots for the filesystem backend
    pub data_dir: PathBuf,
    pub assets_dir: PathBuf,

    // Logical paths inside the storage roots
    pub config_path: String,
    pub translations_path: String,
    pub asset_translations_path: String,
    pub asset_read_limit: usize,

    // Language switcher bubble icons
    pub icon_normal_path: String,
    pub icon_pressed_path: String,
}

impl Config {
    /// Build a configuration with default paths for the given app build.
    pub fn new(app_version: impl Into<String>) -> Self {
        Self {
            poly_version: POLY_VERSION.to_string(),
            app_version: app_version.into(),
            default_language: "en-US".to_string(),
            system_language_id: DEFAULT_SYSTEM_LANGUAGE_ID,
            data_dir: PathBuf::from("data"),
            assets_dir: PathBuf::from("assets"),
            config_path: "poly_config.json".to_string(),
            translations_path: "polyglot/translations".to_string(),
            asset_translations_path: "raw/polyglot/translations".to_string(),
            asset_read_limit: DEFAULT_ASSET_READ_LIMIT,
            icon_normal_path: "raw/polyglot/poly-selector.png".to_string(),
            icon_pressed_path: "raw/polyglot/poly-selector-press.png".to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Self::new(
            std::env::var("POLY_APP_VERSION").context("POLY_APP_VERSION not set")?,
        );

        Ok(Self {
            poly_version: std::env::var("POLY_VERSION").unwrap_or(defaults.poly_version),
            app_version: defaults.app_version,

            default_language: std::env::var("POLY_DEFAULT_LANGUAGE")
                .unwrap_or(defaults.default_language),
            system_language_id: match std::env::var("POLY_SYSTEM_LANGUAGE_ID") {
                Ok(v) => v
                    .parse()
                    .with_context(|| format!("POLY_SYSTEM_LANGUAGE_ID is not a number: {}", v))?,
                Err(_) => defaults.system_language_id,
            },

            data_dir: std::env::var("POLY_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            assets_dir: std::env::var("POLY_ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_dir),

            config_path: std::env::var("POLY_CONFIG_FILE").unwrap_or(defaults.config_path),
            translations_path: std::env::var("POLY_TRANSLATIONS_PATH")
                .unwrap_or(defaults.translations_path),
            asset_translations_path: std::env::var("POLY_ASSET_TRANSLATIONS_PATH")
                .unwrap_or(defaults.asset_translations_path),
            asset_read_limit: match std::env::var("POLY_ASSET_READ_LIMIT") {
                Ok(v) => {
                    let limit: usize = v
                        .parse()
                        .with_context(|| format!("POLY_ASSET_READ_LIMIT is not a number: {}", v))?;
                    anyhow::ensure!(limit > 0, "POLY_ASSET_READ_LIMIT must be greater than zero");
                    limit
                }
                Err(_) => defaults.asset_read_limit,
            },

            icon_normal_path: std::env::var("POLY_ICON_NORMAL")
                .unwrap_or(defaults.icon_normal_path),
            icon_pressed_path: std::env::var("POLY_ICON_PRESSED")
                .unwrap_or(defaults.icon_pressed_path),
        })
    }

    /// Path of a language's file in the primary (writable) translations area.
    pub fn translation_file(&self, code: &str) -> String {
        format!("{}/{}.json", self.translations_path, code)
    }

    /// Path of a language's file in the bundled assets area.
    pub fn asset_translation_file(&self, code: &str) -> String {
        format!("{}/{}.json", self.asset_translations_path, code)
    }
}
