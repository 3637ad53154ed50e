//! Translation coverage audit.
//!
//! Compares a language's table against a reference table so that missing
//! keys, leftover keys, empty values and `{placeholder}` drift show up before
//! a build ships.

use crate::i18n::TranslationTable;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a translation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Keys present in the reference but absent here
    pub errors: Vec<String>,

    /// Non-critical findings (extra keys, empty values, placeholder drift)
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

/// Validator for translation coverage.
pub struct TranslationValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl TranslationValidator {
    /// Compare `candidate` against `reference`.
    ///
    /// # Returns
    /// A `ValidationReport` with one entry per finding, in key order.
    pub fn validate(reference: &TranslationTable, candidate: &TranslationTable) -> ValidationReport {
        let mut report = ValidationReport::new();

        for (key, reference_text) in reference.iter() {
            match candidate.get(key) {
                None => report.errors.push(format!("Missing key '{}'", key)),
                Some("") => report.warnings.push(format!("Empty value for key '{}'", key)),
                Some(text) => {
                    let expected = Self::extract_placeholders(reference_text);
                    let found = Self::extract_placeholders(text);
                    if expected != found {
                        report.warnings.push(format!(
                            "Placeholder mismatch for key '{}': reference has {:?}, translation has {:?}",
                            key, expected, found
                        ));
                    }
                }
            }
        }

        for key in candidate.keys() {
            if !reference.contains_key(key) {
                report.warnings.push(format!("Extra key '{}'", key));
            }
        }

        report
    }

    /// Extract all `{name}` placeholders from text
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX
            .get_or_init(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder regex is valid"));

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> TranslationTable {
        entries.iter().copied().collect()
    }

    // ==================== Placeholder Extraction Tests ====================

    #[test]
    fn test_extract_placeholders() {
        let found = TranslationValidator::extract_placeholders("{count} steps by {name}");
        let expected: BTreeSet<String> =
            ["{count}".to_string(), "{name}".to_string()].into_iter().collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_extract_placeholders_none() {
        assert!(TranslationValidator::extract_placeholders("no tokens {here").is_empty());
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_identical_tables_are_clean() {
        let reference = table(&[("hello", "Hello {name}")]);
        let report = TranslationValidator::validate(&reference, &reference);
        assert!(report.is_clean());
    }

    #[test]
    fn test_missing_key_is_error() {
        let reference = table(&[("hello", "Hello"), ("bye", "Bye")]);
        let candidate = table(&[("hello", "Bonjour")]);

        let report = TranslationValidator::validate(&reference, &candidate);
        assert_eq!(report.errors, vec!["Missing key 'bye'".to_string()]);
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_extra_and_empty_keys_are_warnings() {
        let reference = table(&[("hello", "Hello")]);
        let candidate = table(&[("hello", ""), ("legacy", "Ancien")]);

        let report = TranslationValidator::validate(&reference, &candidate);
        assert!(!report.has_errors());
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].contains("Empty value"));
        assert!(report.warnings[1].contains("Extra key 'legacy'"));
    }

    #[test]
    fn test_placeholder_mismatch_is_warning() {
        let reference = table(&[("steps", "{count} steps")]);
        let candidate = table(&[("steps", "{cnt} pas")]);

        let report = TranslationValidator::validate(&reference, &candidate);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Placeholder mismatch"));
    }

    #[test]
    fn test_placeholder_order_does_not_matter() {
        let reference = table(&[("line", "{a} then {b}")]);
        let candidate = table(&[("line", "{b} avant {a}")]);
        assert!(TranslationValidator::validate(&reference, &candidate).is_clean());
    }
}
