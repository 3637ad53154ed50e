/// Errors raised by the resolution engine and the language catalog.
///
/// Storage misses never show up here as raw I/O errors: the storage capability
/// answers with sentinels, and the engine turns a miss on a translation file
/// into [`PolyError::TranslationMissing`], or into
/// [`PolyError::UnreadableTranslation`] when the file is there.
#[derive(Debug, thiserror::Error)]
pub enum PolyError {
    /// No translation file could be read at the given path.
    #[error("Translation file not found: {path}")]
    TranslationMissing { path: String },

    /// The file exists but could not be read or is not valid JSON.
    #[error("Translation file {path} is unreadable or not valid JSON")]
    UnreadableTranslation { path: String },

    /// The file parsed as JSON but is not a flat string-to-string object.
    #[error("Translation file {path} is not a flat string map")]
    MalformedTranslation {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A bundled asset could not be parsed as JSON. The raw text is kept.
    #[error("Translation asset {path} is not valid JSON")]
    UnparsableAsset { path: String, raw: String },

    /// A bundled asset is larger than the read bound and its prefix did not parse.
    #[error("Translation asset {path} exceeds the {limit}-byte read limit")]
    TruncatedAsset { path: String, limit: usize },

    #[error("Duplicate language id {0} in catalog")]
    DuplicateLanguageId(u32),

    #[error("Duplicate language code '{0}' in catalog")]
    DuplicateLanguageCode(String),

    /// A relatability entry points at an id with no catalog entry.
    #[error("Relatability entry {from} -> {to} references an unknown language id")]
    UnknownRelatedId { from: u32, to: u32 },
}

/// Failures reported by a UI surface. Disposal is best-effort, so callers log
/// these rather than propagate them.
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error("Widget already removed")]
    AlreadyRemoved,

    #[error("Unknown bubble location '{0}'")]
    UnknownLocation(String),
}

pub type Result<T> = std::result::Result<T, PolyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_translation_message_contains_path() {
        let err = PolyError::TranslationMissing {
            path: "polyglot/translations/fr-FR.json".to_string(),
        };
        assert!(err.to_string().contains("fr-FR.json"));
    }

    #[test]
    fn test_malformed_translation_keeps_source() {
        let source = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err = PolyError::MalformedTranslation {
            path: "x.json".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_truncated_asset_message_contains_limit() {
        let err = PolyError::TruncatedAsset {
            path: "raw/a.json".to_string(),
            limit: 128,
        };
        assert!(err.to_string().contains("128-byte"));
    }
}
