//! Language catalog and translation tables.
//!
//! # Architecture
//!
//! - `registry`: the catalog of known languages and the relatability table
//! - `language`: a single catalog entry (id, code, display name)
//! - `table`: the key -> text mapping for one language
//! - `cache`: the active language's table and its text lookup
//! - `metrics`: lookup and load counters
//! - `validator`: coverage audit of one table against a reference
//!
//! # Example
//!
//! ```rust
//! use polyglot::i18n::{LanguageCatalog, TranslationCache, TranslationTable};
//!
//! let catalog = LanguageCatalog::get();
//! assert_eq!(catalog.related_entry("zh-TW").map(|l| l.code()), Some("zh-CN"));
//!
//! let table: TranslationTable = [("hello", "Hello")].into_iter().collect();
//! let cache = TranslationCache::new("en-US", table);
//! assert_eq!(cache.text("hello"), "Hello");
//! ```

mod cache;
mod language;
mod metrics;
mod registry;
mod table;
mod validator;

pub use cache::{missing_text, TranslationCache};
pub use language::LanguageEntry;
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::LanguageCatalog;
pub use table::TranslationTable;
pub use validator::{TranslationValidator, ValidationReport};
