//! Translation lookup with fallback languages and a TTL cache.
//!
//! # Overview
//!
//! - **Sources**: one YAML file per language, `{source_path}/{code}.yaml`, read through a
//!   [`SourceLoader`] (filesystem by default, in-memory for tests and embedding)
//! - **Fallback chain**: the requested language is tried first, then each configured fallback;
//!   the first source that parses into a mapping wins
//! - **Cache**: resolved trees are cached under the *requested* code with a per-entry TTL
//! - **Lookup**: dotted key paths such as `welcome.title`, with `{name}` placeholders
//! - **Validation**: flattened key diff of a language against the default language
//!
//! # Source files
//!
//! ```yaml
//! welcome:
//!   title: "Welcome, {user}!"
//! ```
//!
//! Resolves as `welcome.title`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use lingocache::config::Settings;
//! use lingocache::i18n::{Placeholders, Translator};
//!
//! let translator = Translator::new(Settings::default());
//! let title = translator.get("en", "welcome.title", "Welcome", &Placeholders::new());
//! # let _ = title;
//! ```

mod cache;
mod format;
mod key_path;
mod loader;
mod preferences;
mod resolver;
mod tree;
mod validate;

pub use cache::{CacheStats, SourceStamp, TranslationCache};
pub use format::{FormatError, Placeholders, format_template};
pub use key_path::KeyPath;
pub use loader::{
    DEFAULT_READ_TIMEOUT, FsSourceLoader, MemorySourceLoader, SOURCE_EXTENSION, SourceError,
    SourceLoader, is_valid_language_code, parse_messages,
};
pub use preferences::{MemoryPreferences, PreferenceError, PreferenceStore};
pub use resolver::Translator;
pub use tree::{Lookup, MessageNode, MessageTree};
pub use validate::{KeyDiff, ValidationReport, compare_keys};
