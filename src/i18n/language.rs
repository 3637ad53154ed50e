//! Language entry: one row of the language catalog.

use serde::Serialize;

/// A language known to the device.
///
/// Built once from a static table and never mutated. Within a catalog both
/// `numeric_id` and `code` are unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LanguageEntry {
    /// Numeric system-language id reported by the device (e.g., 2)
    numeric_id: u32,

    /// Language code used for translation file names (e.g., "en-US")
    code: &'static str,

    /// Name shown in the language picker (e.g., "English")
    display_name: &'static str,
}

impl LanguageEntry {
    pub const fn new(numeric_id: u32, code: &'static str, display_name: &'static str) -> Self {
        Self {
            numeric_id,
            code,
            display_name,
        }
    }

    pub fn numeric_id(&self) -> u32 {
        self.numeric_id
    }

    /// Get the language code.
    ///
    /// # Returns
    /// The code as a static string (e.g., "en-US", "zh-TW").
    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn display_name(&self) -> &'static str {
        self.display_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let entry = LanguageEntry::new(2, "en-US", "English");
        assert_eq!(entry.numeric_id(), 2);
        assert_eq!(entry.code(), "en-US");
        assert_eq!(entry.display_name(), "English");
    }

    #[test]
    fn test_entry_equality() {
        let a = LanguageEntry::new(0, "zh-CN", "Chinese");
        let b = a;
        assert_eq!(a, b);
        assert_ne!(a, LanguageEntry::new(1, "zh-TW", "Taiwanese"));
    }
}
