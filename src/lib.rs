//! Language resolution and translation caching for smartwatch mini-apps.
//!
//! [`Polyglot`] decides which language to show from the device language, the
//! user's previous choice and the translation files that actually exist, then
//! serves texts for it. [`LangSwitcher`] adds a corner bubble and a picker on
//! top of any [`UiSurface`].

pub mod bubble;
pub mod config;
pub mod error;
pub mod i18n;
pub mod notify;
pub mod picker;
pub mod poly;
pub mod poly_config;
pub mod storage;
pub mod ui;

pub use bubble::{BubbleLocation, BubbleOptions, LangSwitcher};
pub use config::Config;
pub use error::{PolyError, UiError};
pub use picker::{PickerSelection, PickerSession, RotationMap};
pub use poly::{KeyTranslation, LanguageSwitch, Polyglot};
pub use poly_config::PolyConfig;
pub use storage::{FsStorage, MemoryStorage, Storage};
pub use ui::UiSurface;
