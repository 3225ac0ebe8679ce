//! Settings value types.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Language identifier used as cache and source key. No normalization is applied.
pub type LanguageCode = String;

/// Verbosity threshold for translation diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    /// Everything, including cache hits and missing keys.
    Debug,
    /// Loads, fallbacks and cache administration.
    #[default]
    Info,
    /// Recoverable problems only.
    Warning,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// What: Upper-case name of the level as used in settings files.
    ///
    /// Output:
    /// - One of `DEBUG`, `INFO`, `WARNING`, `ERROR`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// What: Check whether a message of `level` passes this threshold.
    ///
    /// Inputs:
    /// - `level`: Level of the message about to be emitted
    ///
    /// Output:
    /// - `true` when the message should be emitted
    ///
    /// Details:
    /// - Errors always pass, debug output only passes a `Debug` threshold.
    #[must_use]
    pub fn allows(self, level: Self) -> bool {
        level >= self
    }

    /// What: Matching `tracing` filter directive for this level.
    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            other => Err(format!(
                "Unknown log level '{other}'. Expected one of DEBUG, INFO, WARNING, ERROR"
            )),
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Complete, immutable translation settings.
///
/// A new value is produced for every reconfiguration; nothing mutates a
/// `Settings` that is already shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Directory holding `{code}.yaml` message sources.
    pub source_path: PathBuf,
    /// Alternate languages tried in order after the requested one.
    pub fallback_languages: Vec<LanguageCode>,
    /// Language used when no user or guild preference is known.
    pub default_language: LanguageCode,
    /// Cache time-to-live in minutes.
    pub cache_ttl_minutes: u64,
    /// Master switch for translation diagnostics.
    pub logging_enabled: bool,
    /// Colour console output.
    pub colored_output: bool,
    /// Diagnostics threshold.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("translation").join("messages"),
            fallback_languages: vec!["en".to_string(), "de".to_string()],
            default_language: "en".to_string(),
            cache_ttl_minutes: 30,
            logging_enabled: true,
            colored_output: true,
            log_level: LogLevel::Info,
        }
    }
}

impl Settings {
    /// What: Produce a new settings value with explicit overrides applied.
    ///
    /// Inputs:
    /// - `overrides`: Fields to replace; `None` keeps the current value
    ///
    /// Output:
    /// - New `Settings`; `self` is left untouched
    #[must_use]
    pub fn apply(&self, overrides: &SettingsOverrides) -> Self {
        let mut next = self.clone();
        if let Some(path) = &overrides.source_path {
            next.source_path.clone_from(path);
        }
        if let Some(chain) = &overrides.fallback_languages {
            next.fallback_languages.clone_from(chain);
        }
        if let Some(lang) = &overrides.default_language {
            next.default_language.clone_from(lang);
        }
        if let Some(ttl) = overrides.cache_ttl_minutes {
            next.cache_ttl_minutes = ttl;
        }
        if let Some(enabled) = overrides.logging_enabled {
            next.logging_enabled = enabled;
        }
        if let Some(colored) = overrides.colored_output {
            next.colored_output = colored;
        }
        if let Some(level) = overrides.log_level {
            next.log_level = level;
        }
        next
    }

    /// What: Cache time-to-live as a `Duration`.
    #[must_use]
    pub const fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache_ttl_minutes.saturating_mul(60))
    }
}

/// Explicitly supplied settings fields for a reconfiguration.
///
/// Every field is optional; only `Some` fields take effect. This is also the
/// shape of the TOML settings file, which rejects unknown keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsOverrides {
    /// Directory holding message sources.
    #[serde(default, alias = "path")]
    pub source_path: Option<PathBuf>,
    /// Ordered fallback chain.
    #[serde(default, alias = "fallback_langs")]
    pub fallback_languages: Option<Vec<LanguageCode>>,
    /// Default language code.
    #[serde(default, alias = "default_lang")]
    pub default_language: Option<LanguageCode>,
    /// Cache time-to-live in minutes.
    #[serde(default, alias = "cache_ttl")]
    pub cache_ttl_minutes: Option<u64>,
    /// Enable translation diagnostics.
    #[serde(default, alias = "logging")]
    pub logging_enabled: Option<bool>,
    /// Colour console output.
    #[serde(default, alias = "colored")]
    pub colored_output: Option<bool>,
    /// Diagnostics threshold.
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

impl SettingsOverrides {
    /// What: Layer `other` on top of `self`, `other` winning per field.
    ///
    /// Details:
    /// - Used to combine a settings file with command-line flags.
    #[must_use]
    pub fn merged_with(mut self, other: Self) -> Self {
        if other.source_path.is_some() {
            self.source_path = other.source_path;
        }
        if other.fallback_languages.is_some() {
            self.fallback_languages = other.fallback_languages;
        }
        if other.default_language.is_some() {
            self.default_language = other.default_language;
        }
        if other.cache_ttl_minutes.is_some() {
            self.cache_ttl_minutes = other.cache_ttl_minutes;
        }
        if other.logging_enabled.is_some() {
            self.logging_enabled = other.logging_enabled;
        }
        if other.colored_output.is_some() {
            self.colored_output = other.colored_output;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
        self
    }
}

/// Flat diagnostic view of the active configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsReport {
    /// Message source directory, as displayed.
    pub translation_path: String,
    /// Fallback chain in priority order.
    pub fallback_languages: Vec<LanguageCode>,
    /// Default language code.
    pub default_language: LanguageCode,
    /// Cache TTL in minutes.
    pub cache_ttl_minutes: u64,
    /// Diagnostics enabled.
    pub logging_enabled: bool,
    /// Colour console output.
    pub colored_logging: bool,
    /// Diagnostics threshold.
    pub log_level: LogLevel,
    /// Whether the settings were ever explicitly configured.
    pub configured: bool,
}

impl SettingsReport {
    /// What: Build the report from a settings value.
    #[must_use]
    pub fn new(settings: &Settings, configured: bool) -> Self {
        Self {
            translation_path: settings.source_path.display().to_string(),
            fallback_languages: settings.fallback_languages.clone(),
            default_language: settings.default_language.clone(),
            cache_ttl_minutes: settings.cache_ttl_minutes,
            logging_enabled: settings.logging_enabled,
            colored_logging: settings.colored_output,
            log_level: settings.log_level,
            configured,
        }
    }
}
