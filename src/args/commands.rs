//! Subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use lingocache::i18n::{Placeholders, Translator};
use lingocache::update::{
    HttpVersionSource, UpdateSettings, VersionChecker, VersionSource, render_status,
};
use serde::Serialize;

use crate::args::CliError;

/// What: Print a value as pretty JSON or through a text renderer.
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

/// What: Resolve one key in one language and print it.
///
/// Details:
/// - Always succeeds; unresolvable keys print the default.
pub async fn handle_get(
    translator: &Translator,
    json: bool,
    lang: &str,
    key: &str,
    default: &str,
    placeholders: &[(String, String)],
) -> Result<ExitCode, CliError> {
    tracing::info!(lang, key, "lookup requested from CLI");
    let values: Placeholders = placeholders.iter().cloned().collect();
    let text = translator.get_async(lang, key, default, &values).await;
    emit(json, &text, String::clone)?;
    Ok(ExitCode::SUCCESS)
}

/// What: Resolve one key in several languages and print `lang: text` lines.
pub async fn handle_all(
    translator: &Translator,
    json: bool,
    key: &str,
    languages: &[String],
) -> Result<ExitCode, CliError> {
    let languages = (!languages.is_empty()).then_some(languages);
    let results = translator.get_all_translations(key, languages).await;
    tracing::info!(key, found = results.len(), "batch lookup finished");
    emit(json, &results, |map| {
        map.iter()
            .map(|(lang, text)| format!("{lang}: {text}"))
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    Ok(if results.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// What: Validate a language and print the report.
///
/// Output:
/// - Failure exit code when the language is invalid
pub async fn handle_validate(
    translator: &Translator,
    json: bool,
    lang: &str,
) -> Result<ExitCode, CliError> {
    let report = translator.validate_translations(lang).await;
    emit(json, &report, |r| {
        let mut lines = vec![format!(
            "{lang}: {}",
            if r.valid { "valid" } else { "invalid" }
        )];
        lines.extend(r.errors.iter().map(|e| format!("  error: {e}")));
        lines.extend(r.warnings.iter().map(|w| format!("  warning: {w}")));
        lines.extend(r.missing_keys.iter().map(|k| format!("  missing: {k}")));
        lines.extend(r.extra_keys.iter().map(|k| format!("  extra: {k}")));
        lines.join("\n")
    })?;
    Ok(if report.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// What: List available languages, one per line.
pub async fn handle_languages(translator: &Translator, json: bool) -> Result<ExitCode, CliError> {
    let languages = translator.available_languages().await;
    emit(json, &languages, |l| l.join("\n"))?;
    Ok(ExitCode::SUCCESS)
}

/// What: Print the effective settings.
pub fn handle_settings(translator: &Translator, json: bool) -> Result<ExitCode, CliError> {
    let report = translator.settings_report();
    emit(json, &report, |r| {
        [
            format!("translation_path: {}", r.translation_path),
            format!("fallback_languages: {}", r.fallback_languages.join(", ")),
            format!("default_language: {}", r.default_language),
            format!("cache_ttl_minutes: {}", r.cache_ttl_minutes),
            format!("logging_enabled: {}", r.logging_enabled),
            format!("colored_logging: {}", r.colored_logging),
            format!("log_level: {}", r.log_level),
            format!("configured: {}", r.configured),
        ]
        .join("\n")
    })?;
    Ok(ExitCode::SUCCESS)
}

/// Options of the `version-check` subcommand.
#[derive(Debug, Clone)]
pub struct VersionCheckOptions {
    /// Running version.
    pub current: Option<String>,
    /// File holding the running version.
    pub version_file: Option<PathBuf>,
    /// Latest-version URL.
    pub url: Option<String>,
    /// Repository URL.
    pub repo: Option<String>,
    /// Timeout in seconds.
    pub timeout: Option<u64>,
    /// Ignore cached results.
    pub force: bool,
}

/// What: Check for a newer published version and print the status.
///
/// # Errors
/// - `CliError::Update` when no running version is available or the HTTP client fails
pub async fn handle_version_check(
    options: VersionCheckOptions,
    json: bool,
    colored: bool,
    quiet: bool,
) -> Result<ExitCode, CliError> {
    let mut settings = UpdateSettings {
        version_file: options.version_file,
        colored_output: colored,
        auto_check_on_start: false,
        show_console_output: !quiet && !json,
        ..UpdateSettings::default()
    };
    if let Some(repo) = options.repo {
        settings = settings.with_repository(repo);
    }
    if let Some(url) = options.url {
        settings.version_url = url;
    }
    if let Some(timeout) = options.timeout {
        settings.timeout_secs = timeout;
    }

    let source: Arc<dyn VersionSource> = Arc::new(HttpVersionSource::new(&settings)?);
    let checker = VersionChecker::new(options.current.as_deref(), settings, source)?;
    let report = checker.check_for_updates(options.force).await;
    emit(json, &report, |r| render_status(r, colored))?;
    Ok(if report.error.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
