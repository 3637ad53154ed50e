//! Resolution engine: decides which language the user sees, keeps its
//! translation table in memory, and persists the decision.
//!
//! # Startup
//!
//! 1. Load the persisted [`PolyConfig`] (missing or corrupt reads as empty).
//! 2. If the record was written by another engine/app build, or has no file
//!    list, rescan: list the primary translations directory, or when that
//!    yields nothing, probe the bundled assets for every catalog language and
//!    switch to fallback mode.
//! 3. Pick the language: a changed device language wins, then the saved
//!    language if still supported, then the device language's related or
//!    default language.
//! 4. Load its table; on failure use the default language with an empty table.
//! 5. Persist the device language code and the chosen language.
//!
//! # Ordering
//!
//! On a switch the table is replaced first, then the record is persisted, and
//! only then are subscribers notified, so no observer ever sees a new code
//! paired with a stale table.

use crate::config::Config;
use crate::error::{PolyError, Result};
use crate::i18n::{
    LanguageCatalog, MetricsReport, TranslationCache, TranslationTable, TranslationValidator,
    ValidationReport,
};
use crate::notify::ChangeBus;
use crate::poly_config::PolyConfig;
use crate::storage::{read_asset_json, AssetPayload, Storage};
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, info, warn};

/// Outcome of [`Polyglot::set_language`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSwitch {
    /// The requested language was already active. Nothing was written.
    Unchanged,
    /// The table was replaced, persisted, and subscribers were notified.
    Switched,
    /// The table was replaced and persisted, subscribers were not notified.
    /// The host must rebuild its UI from the first page.
    RestartRequired,
}

/// One language's text for a given key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyTranslation {
    pub lang_code: String,
    pub text: String,
}

pub struct Polyglot<S> {
    storage: S,
    config: Config,
    catalog: LanguageCatalog,
    poly_config: PolyConfig,
    supported: Vec<String>,
    is_using_fallback: bool,
    sys_lang_code: Option<String>,
    cache: TranslationCache,
    subscribers: ChangeBus,
}

impl<S: Storage> Polyglot<S> {
    /// Boot the engine with the default language catalog.
    pub fn new(storage: S, config: Config) -> Self {
        Self::with_catalog(storage, config, LanguageCatalog::get().clone())
    }

    /// Boot the engine with a custom language catalog.
    pub fn with_catalog(storage: S, config: Config, catalog: LanguageCatalog) -> Self {
        let mut poly_config = PolyConfig::load(&storage, &config.config_path);

        let should_recache = poly_config.is_stale(&config.poly_version, &config.app_version);
        if should_recache {
            debug!(
                "Version mismatch or no saved config (saved poly {:?}, app {:?}), recaching",
                poly_config.poly_version, poly_config.app_version
            );
            poly_config.stamp(&config.poly_version, &config.app_version);
        }

        let (supported, is_using_fallback) = match poly_config.files.clone() {
            Some(files) if !should_recache => {
                debug!("Reusing cached language list: {}", files.join(", "));
                (files, poly_config.is_using_fallback)
            }
            _ => {
                let (files, is_using_fallback) = scan_translations(&storage, &config, &catalog);
                poly_config.files = Some(files.clone());
                poly_config.is_using_fallback = is_using_fallback;
                poly_config.save(&storage, &config.config_path);
                (files, is_using_fallback)
            }
        };

        let sys_lang_code = catalog
            .get_by_id(config.system_language_id)
            .map(|lang| lang.code().to_string());
        debug!("System language code: {:?}", sys_lang_code);

        let mut engine = Self {
            storage,
            cache: TranslationCache::new(config.default_language.clone(), TranslationTable::new()),
            config,
            catalog,
            poly_config,
            supported,
            is_using_fallback,
            sys_lang_code,
            subscribers: ChangeBus::new(),
        };

        let language = engine.initial_language();
        match engine.read_translations(&language) {
            Ok(table) => {
                debug!("Loaded {} texts for language {}", table.len(), language);
                engine.cache.replace(language, table);
            }
            Err(e) => {
                warn!("Error loading translations for language {}: {}", language, e);
                let default = engine.config.default_language.clone();
                engine.cache.replace(default, TranslationTable::new());
            }
        }

        engine.poly_config.sys_lang_code = engine.sys_lang_code.clone();
        engine.poly_config.language = Some(engine.cache.language().to_string());
        engine.persist();

        engine
    }

    fn initial_language(&self) -> String {
        let current = self.sys_lang_code.as_deref();

        if let Some(saved) = self.poly_config.sys_lang_code.as_deref() {
            if current != Some(saved) {
                debug!(
                    "System language changed from {} to {:?} since last run",
                    saved, current
                );
                return self.system_or_related(current);
            }
        }

        if let Some(saved) = self.poly_config.language.as_deref() {
            if self.is_language_supported(saved) {
                debug!("Using saved language: {}", saved);
                return saved.to_string();
            }
        }

        debug!("No usable saved language, resolving from system language");
        self.system_or_related(current)
    }

    fn system_or_related(&self, code: Option<&str>) -> String {
        match code {
            Some(code) => self.related_lang_code(code),
            None => self.config.default_language.clone(),
        }
    }

    /// Code of the active language.
    pub fn language(&self) -> &str {
        self.cache.language()
    }

    /// Switch to `code`, or to its related/default language when `code` is
    /// not in the catalog.
    ///
    /// # Returns
    /// * `Ok(LanguageSwitch::Unchanged)` if the language is already active
    /// * `Ok(LanguageSwitch::Switched)` after subscribers were notified
    /// * `Ok(LanguageSwitch::RestartRequired)` when `restart` is set; the host
    ///   rebuilds its UI instead of being notified
    /// * `Err` if the new table could not be loaded; nothing was changed
    pub fn set_language(&mut self, code: &str, restart: bool) -> Result<LanguageSwitch> {
        if code == self.cache.language() {
            return Ok(LanguageSwitch::Unchanged);
        }

        let target = match self.catalog.get_by_code(code) {
            Some(lang) => lang.code().to_string(),
            None => self.related_lang_code(code),
        };

        if target == self.cache.language() {
            debug!("{} resolves to the active language {}", code, target);
            return Ok(LanguageSwitch::Unchanged);
        }

        let table = self.read_translations(&target).map_err(|e| {
            warn!("Error setting language {}: {}", target, e);
            e
        })?;

        self.cache.replace(target, table);
        self.poly_config.language = Some(self.cache.language().to_string());
        self.poly_config.sys_lang_code = self.sys_lang_code.clone();
        self.persist();

        if restart {
            info!("Language set to {}, restart requested", self.cache.language());
            return Ok(LanguageSwitch::RestartRequired);
        }

        info!("Language set to {}", self.cache.language());
        self.subscribers
            .notify(self.cache.language(), self.cache.all_texts());
        Ok(LanguageSwitch::Switched)
    }

    /// Closest supported language for `code`.
    ///
    /// Returns `code` itself when supported, else its relatability mapping,
    /// else the configured default language.
    pub fn related_lang_code(&self, code: &str) -> String {
        if self.is_language_supported(code) {
            return code.to_string();
        }

        let related = self
            .catalog
            .related_entry(code)
            .map(|lang| lang.code().to_string())
            .unwrap_or_else(|| self.config.default_language.clone());
        debug!("Related language code for {} is {}", code, related);
        related
    }

    /// Text for `key` in the active language, or a visible missing-key marker.
    pub fn text(&self, key: &str) -> Cow<'_, str> {
        self.cache.text(key)
    }

    pub fn all_texts(&self) -> &TranslationTable {
        self.cache.all_texts()
    }

    pub fn supported_languages(&self) -> &[String] {
        &self.supported
    }

    pub fn is_language_supported(&self, code: &str) -> bool {
        self.supported.iter().any(|supported| supported == code)
    }

    /// Text for `key` in every supported language that defines it. Reads each
    /// language's file; meant for auditing, not for rendering.
    pub fn available_translations_for_key(&self, key: &str) -> Vec<KeyTranslation> {
        self.supported
            .iter()
            .filter_map(|code| {
                let table = self.read_translations(code).ok()?;
                let text = table.get(key)?;
                Some(KeyTranslation {
                    lang_code: code.clone(),
                    text: text.to_string(),
                })
            })
            .collect()
    }

    /// Compare every supported language's table against `reference`.
    pub fn audit_translations(&self, reference: &str) -> Result<Vec<(String, ValidationReport)>> {
        let reference_table = self.read_translations(reference)?;

        Ok(self
            .supported
            .iter()
            .filter(|code| code.as_str() != reference)
            .map(|code| {
                let report = match self.read_translations(code) {
                    Ok(table) => TranslationValidator::validate(&reference_table, &table),
                    Err(e) => ValidationReport {
                        errors: vec![e.to_string()],
                        warnings: Vec::new(),
                    },
                };
                (code.clone(), report)
            })
            .collect())
    }

    /// Register a callback for successful, non-restarting language switches.
    pub fn on_language_change<F>(&mut self, subscriber: F)
    where
        F: FnMut(&str, &TranslationTable) + 'static,
    {
        self.subscribers.subscribe(subscriber);
    }

    /// Display name of the active language.
    pub fn lang_display_name(&self) -> Option<&'static str> {
        self.catalog.display_name(self.cache.language())
    }

    /// Code of the device language, if the catalog knows its id.
    pub fn sys_lang_code(&self) -> Option<&str> {
        self.sys_lang_code.as_deref()
    }

    pub fn sys_lang_name(&self) -> Option<&'static str> {
        self.catalog
            .get_by_id(self.config.system_language_id)
            .map(|lang| lang.display_name())
    }

    pub fn is_using_fallback(&self) -> bool {
        self.is_using_fallback
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn metrics(&self) -> MetricsReport {
        self.cache.metrics().report()
    }

    fn persist(&self) {
        self.poly_config
            .save(&self.storage, &self.config.config_path);
    }

    /// Load a language's table from the bundled assets in fallback mode, or
    /// from the primary translations directory otherwise.
    fn read_translations(&self, code: &str) -> Result<TranslationTable> {
        let result = if self.is_using_fallback {
            self.read_asset_translations(code)
        } else {
            let path = self.config.translation_file(code);
            match self.storage.read_json(&path) {
                Some(value) => TranslationTable::from_json(value)
                    .map_err(|source| PolyError::MalformedTranslation { path, source }),
                None if self.storage.file_exists(&path) => {
                    Err(PolyError::UnreadableTranslation { path })
                }
                None => Err(PolyError::TranslationMissing { path }),
            }
        };

        match &result {
            Ok(_) => self.cache.metrics().record_table_load(),
            Err(_) => self.cache.metrics().record_load_failure(),
        }
        result
    }

    fn read_asset_translations(&self, code: &str) -> Result<TranslationTable> {
        let path = self.config.asset_translation_file(code);
        let limit = self.config.asset_read_limit;

        match read_asset_json(&self.storage, &path, limit) {
            Some(AssetPayload::Json(value)) => TranslationTable::from_json(value)
                .map_err(|source| PolyError::MalformedTranslation { path, source }),
            Some(AssetPayload::Text {
                truncated: true, ..
            }) => Err(PolyError::TruncatedAsset { path, limit }),
            Some(AssetPayload::Text { raw, .. }) => Err(PolyError::UnparsableAsset { path, raw }),
            None => Err(PolyError::TranslationMissing { path }),
        }
    }
}

/// Find the languages that have translation files.
///
/// # Returns
/// The language codes (extension stripped) and whether fallback mode is on.
fn scan_translations<S: Storage>(
    storage: &S,
    config: &Config,
    catalog: &LanguageCatalog,
) -> (Vec<String>, bool) {
    let files: Vec<String> = storage
        .list_dir(&config.translations_path)
        .into_iter()
        .filter_map(|name| name.strip_suffix(".json").map(str::to_string))
        .collect();

    if !files.is_empty() {
        debug!("Files found in translations path: {}", files.join(", "));
        return (files, false);
    }

    debug!("No translation files found in primary path, using bundled assets");
    let files: Vec<String> = catalog
        .list_all()
        .iter()
        .filter(|lang| storage.asset_exists(&config.asset_translation_file(lang.code())))
        .map(|lang| lang.code().to_string())
        .collect();
    debug!("Fallback files found: {}", files.join(", "));
    (files, true)
}
