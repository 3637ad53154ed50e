use crate::i18n::{TranslationMetrics, TranslationTable};
use std::borrow::Cow;

/// Text shown in place of a missing translation. Deliberately visible so that
/// gaps show up on screen during development.
pub fn missing_text(key: &str) -> String {
    format!("\"{}\"\nnot found", key)
}

/// In-memory table for the active language.
#[derive(Debug)]
pub struct TranslationCache {
    language: String,
    table: TranslationTable,
    metrics: TranslationMetrics,
}

impl TranslationCache {
    pub fn new(language: impl Into<String>, table: TranslationTable) -> Self {
        Self {
            language: language.into(),
            table,
            metrics: TranslationMetrics::new(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Stored text for `key`, or the missing-key marker.
    pub fn text(&self, key: &str) -> Cow<'_, str> {
        match self.table.get(key) {
            Some(text) => {
                self.metrics.record_lookup_hit();
                Cow::Borrowed(text)
            }
            None => {
                self.metrics.record_lookup_miss();
                Cow::Owned(missing_text(key))
            }
        }
    }

    pub fn all_texts(&self) -> &TranslationTable {
        &self.table
    }

    /// Swap in a new language and its table in one step.
    pub fn replace(&mut self, language: impl Into<String>, table: TranslationTable) {
        self.language = language.into();
        self.table = table;
    }

    pub fn metrics(&self) -> &TranslationMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> TranslationTable {
        [("hello", "Hello"), ("empty", "")].into_iter().collect()
    }

    #[test]
    fn test_text_returns_stored_value() {
        let cache = TranslationCache::new("en-US", english());
        assert_eq!(cache.text("hello"), "Hello");
    }

    #[test]
    fn test_text_returns_empty_stored_value() {
        let cache = TranslationCache::new("en-US", english());
        assert_eq!(cache.text("empty"), "");
    }

    #[test]
    fn test_text_missing_key_marker() {
        let cache = TranslationCache::new("en-US", english());
        let text = cache.text("title");
        assert!(text.contains("title"));
        assert!(text.contains("not found"));
        assert_eq!(text, "\"title\"\nnot found");
    }

    #[test]
    fn test_lookups_are_counted() {
        let cache = TranslationCache::new("en-US", english());
        cache.text("hello");
        cache.text("nope");
        cache.text("nope");
        assert_eq!(cache.metrics().lookup_hits(), 1);
        assert_eq!(cache.metrics().lookup_misses(), 2);
    }

    #[test]
    fn test_replace_is_not_a_merge() {
        let mut cache = TranslationCache::new("en-US", english());
        let french: TranslationTable = [("bye", "Au revoir")].into_iter().collect();
        cache.replace("fr-FR", french);

        assert_eq!(cache.language(), "fr-FR");
        assert_eq!(cache.all_texts().len(), 1);
        assert_eq!(cache.text("bye"), "Au revoir");
        assert!(cache.text("hello").contains("not found"));
    }
}
