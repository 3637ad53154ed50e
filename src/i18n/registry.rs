//! Language catalog: every language the device can report, plus the
//! relatability table used when a language has no translation file.
//!
//! The default catalog is a lazily initialized singleton built from static
//! tables. Custom catalogs can be built with [`LanguageCatalog::with_tables`],
//! which checks the uniqueness invariants.

use crate::error::{PolyError, Result};
use crate::i18n::LanguageEntry;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

/// Static table of known languages and their nearest-neighbour fallbacks.
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    languages: Vec<LanguageEntry>,

    /// Unsupported numeric id -> fallback numeric id. Not symmetric unless
    /// both directions are listed.
    relatability: BTreeMap<u32, u32>,
}

static CATALOG: OnceLock<LanguageCatalog> = OnceLock::new();

impl LanguageCatalog {
    /// Get the default catalog instance.
    pub fn get() -> &'static LanguageCatalog {
        CATALOG.get_or_init(|| LanguageCatalog {
            languages: default_languages(),
            relatability: default_relatability(),
        })
    }

    /// Build a catalog from explicit tables.
    ///
    /// # Returns
    /// * `Err` if an id or code appears twice, or a relatability entry
    ///   references an id that is not in `languages`
    pub fn with_tables(
        languages: Vec<LanguageEntry>,
        relatability: impl IntoIterator<Item = (u32, u32)>,
    ) -> Result<Self> {
        let mut ids = HashSet::new();
        let mut codes = HashSet::new();
        for lang in &languages {
            if !ids.insert(lang.numeric_id()) {
                return Err(PolyError::DuplicateLanguageId(lang.numeric_id()));
            }
            if !codes.insert(lang.code()) {
                return Err(PolyError::DuplicateLanguageCode(lang.code().to_string()));
            }
        }

        let relatability: BTreeMap<u32, u32> = relatability.into_iter().collect();
        for (&from, &to) in &relatability {
            if !ids.contains(&from) || !ids.contains(&to) {
                return Err(PolyError::UnknownRelatedId { from, to });
            }
        }

        Ok(Self {
            languages,
            relatability,
        })
    }

    pub fn get_by_id(&self, numeric_id: u32) -> Option<&LanguageEntry> {
        self.languages
            .iter()
            .find(|lang| lang.numeric_id() == numeric_id)
    }

    /// Get a language entry by its exact code.
    ///
    /// # Returns
    /// * `Some(&LanguageEntry)` if the code is in the catalog
    /// * `None` otherwise (codes are case-sensitive)
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageEntry> {
        self.languages.iter().find(|lang| lang.code() == code)
    }

    /// All entries in table order.
    pub fn list_all(&self) -> &[LanguageEntry] {
        &self.languages
    }

    /// The curated fallback for `code`, if the relatability table has one.
    pub fn related_entry(&self, code: &str) -> Option<&LanguageEntry> {
        let entry = self.get_by_code(code)?;
        let related_id = self.relatability.get(&entry.numeric_id())?;
        self.get_by_id(*related_id)
    }

    pub fn display_name(&self, code: &str) -> Option<&'static str> {
        self.get_by_code(code).map(|lang| lang.display_name())
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

/// Languages reported by the device, keyed by system-language id.
fn default_languages() -> Vec<LanguageEntry> {
    vec![
        LanguageEntry::new(0, "zh-CN", "Chinese"),
        LanguageEntry::new(1, "zh-TW", "Taiwanese"),
        LanguageEntry::new(2, "en-US", "English"),
        LanguageEntry::new(3, "es-ES", "Spanish"),
        LanguageEntry::new(4, "ru-RU", "Russian"),
        LanguageEntry::new(5, "ko-KR", "Korean"),
        LanguageEntry::new(6, "fr-FR", "French"),
        LanguageEntry::new(7, "de-DE", "German"),
        LanguageEntry::new(8, "id-ID", "Indonesian"),
        LanguageEntry::new(9, "pl-PL", "Polish"),
        LanguageEntry::new(10, "it-IT", "Italian"),
        LanguageEntry::new(11, "ja-JP", "Japanese"),
        LanguageEntry::new(12, "th-TH", "Thai"),
        LanguageEntry::new(13, "ar-EG", "Arabic"),
        LanguageEntry::new(14, "vi-VN", "Vietnamese"),
        LanguageEntry::new(15, "pt-PT", "Portuguese"),
        LanguageEntry::new(16, "nl-NL", "Dutch"),
        LanguageEntry::new(17, "tr-TR", "Turkish"),
        LanguageEntry::new(18, "uk-UA", "Ukrainian"),
        LanguageEntry::new(19, "iw-IL", "Hebrew"),
        LanguageEntry::new(20, "pt-BR", "Portuguese"),
        LanguageEntry::new(21, "ro-RO", "Romanian"),
        LanguageEntry::new(22, "cs-CZ", "Czech"),
        LanguageEntry::new(23, "el-GR", "Greek"),
        LanguageEntry::new(24, "sr-RS", "Serbian"),
        LanguageEntry::new(25, "ca-ES", "Catalan"),
        LanguageEntry::new(26, "fi-FI", "Finnish"),
        LanguageEntry::new(27, "nb-NO", "Norwegian"),
        LanguageEntry::new(28, "da-DK", "Danish"),
        LanguageEntry::new(29, "sv-SE", "Swedish"),
        LanguageEntry::new(30, "hu-HU", "Hungarian"),
        LanguageEntry::new(31, "ms-MY", "Malay"),
        LanguageEntry::new(32, "sk-SK", "Slovak"),
        LanguageEntry::new(33, "hi-IN", "Hindi"),
    ]
}

fn default_relatability() -> BTreeMap<u32, u32> {
    BTreeMap::from([
        (0, 1),   // zh-CN -> zh-TW
        (1, 0),   // zh-TW -> zh-CN
        (15, 20), // pt-PT -> pt-BR
        (20, 15), // pt-BR -> pt-PT
        (18, 4),  // uk-UA -> ru-RU
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chinese_catalog() -> LanguageCatalog {
        LanguageCatalog::with_tables(
            vec![
                LanguageEntry::new(0, "zh-CN", "Chinese"),
                LanguageEntry::new(1, "zh-TW", "Taiwanese"),
            ],
            [(1, 0)],
        )
        .expect("valid catalog")
    }

    // ==================== Default Catalog Tests ====================

    #[test]
    fn test_get_returns_singleton() {
        let catalog1 = LanguageCatalog::get();
        let catalog2 = LanguageCatalog::get();
        assert!(std::ptr::eq(catalog1, catalog2));
    }

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = LanguageCatalog::get();
        let rebuilt = LanguageCatalog::with_tables(
            catalog.list_all().to_vec(),
            default_relatability(),
        );
        assert!(rebuilt.is_ok());
        assert_eq!(catalog.len(), 34);
    }

    #[test]
    fn test_get_by_id_and_code() {
        let catalog = LanguageCatalog::get();
        assert_eq!(catalog.get_by_id(2).map(|l| l.code()), Some("en-US"));
        assert_eq!(catalog.get_by_code("ja-JP").map(|l| l.numeric_id()), Some(11));
        assert!(catalog.get_by_id(999).is_none());
        assert!(catalog.get_by_code("en-us").is_none());
    }

    #[test]
    fn test_display_name() {
        let catalog = LanguageCatalog::get();
        assert_eq!(catalog.display_name("de-DE"), Some("German"));
        assert_eq!(catalog.display_name("xx-XX"), None);
    }

    // ==================== Relatability Tests ====================

    #[test]
    fn test_related_entry_default_table() {
        let catalog = LanguageCatalog::get();
        assert_eq!(catalog.related_entry("zh-TW").map(|l| l.code()), Some("zh-CN"));
        assert_eq!(catalog.related_entry("pt-PT").map(|l| l.code()), Some("pt-BR"));
        assert_eq!(catalog.related_entry("uk-UA").map(|l| l.code()), Some("ru-RU"));
    }

    #[test]
    fn test_relatability_is_not_inferred_symmetric() {
        let catalog = LanguageCatalog::get();
        // uk-UA -> ru-RU is listed, ru-RU -> uk-UA is not
        assert!(catalog.related_entry("ru-RU").is_none());

        let catalog = chinese_catalog();
        assert_eq!(catalog.related_entry("zh-TW").map(|l| l.code()), Some("zh-CN"));
        assert!(catalog.related_entry("zh-CN").is_none());
    }

    #[test]
    fn test_related_entry_unknown_code() {
        assert!(LanguageCatalog::get().related_entry("xx-XX").is_none());
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_with_tables_rejects_duplicate_id() {
        let result = LanguageCatalog::with_tables(
            vec![
                LanguageEntry::new(0, "zh-CN", "Chinese"),
                LanguageEntry::new(0, "zh-TW", "Taiwanese"),
            ],
            [],
        );
        assert!(matches!(result, Err(PolyError::DuplicateLanguageId(0))));
    }

    #[test]
    fn test_with_tables_rejects_duplicate_code() {
        let result = LanguageCatalog::with_tables(
            vec![
                LanguageEntry::new(0, "zh-CN", "Chinese"),
                LanguageEntry::new(1, "zh-CN", "Chinese again"),
            ],
            [],
        );
        assert!(matches!(result, Err(PolyError::DuplicateLanguageCode(code)) if code == "zh-CN"));
    }

    #[test]
    fn test_with_tables_rejects_dangling_relation() {
        let result = LanguageCatalog::with_tables(
            vec![LanguageEntry::new(0, "zh-CN", "Chinese")],
            [(0, 7)],
        );
        assert!(matches!(
            result,
            Err(PolyError::UnknownRelatedId { from: 0, to: 7 })
        ));
    }

    proptest! {
        #[test]
        fn prop_id_and_code_lookups_agree(index in 0usize..34) {
            let catalog = LanguageCatalog::get();
            let entry = catalog.list_all()[index];
            prop_assert_eq!(catalog.get_by_id(entry.numeric_id()), Some(&entry));
            prop_assert_eq!(catalog.get_by_code(entry.code()), Some(&entry));
        }
    }
}
