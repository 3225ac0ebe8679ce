//! Translation settings.
//!
//! Settings are plain immutable values. Reconfiguration builds a new
//! [`Settings`] from explicit [`SettingsOverrides`]; fields that are not
//! supplied keep their previous value. Overrides can also be read from a
//! TOML file:
//!
//! ```toml
//! path = "locales/messages"
//! fallback_languages = ["en", "de"]
//! default_language = "en"
//! cache_ttl = 30
//! logging = true
//! colored = true
//! log_level = "INFO"
//! ```

mod file;
mod types;

pub use file::{ConfigError, load_overrides};
pub use types::{LanguageCode, LogLevel, Settings, SettingsOverrides, SettingsReport};
