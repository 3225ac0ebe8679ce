//! Settings file applied to a running translator.

#![cfg(test)]

use std::fs;
use std::sync::Arc;

use lingocache::config::{LogLevel, Settings, load_overrides};
use lingocache::i18n::{MemorySourceLoader, Placeholders, SourceLoader, Translator};
use tempfile::TempDir;

#[tokio::test]
/// What: A settings file reconfigures fallbacks, default language and TTL in one step.
///
/// Inputs:
/// - TOML with aliases (`fallback_langs`, `default_lang`, `cache_ttl`) and `log_level`.
///
/// Output:
/// - Report shows the new values and `configured = true`; the TTL override
///   replaced the cache, so earlier entries are gone.
///
/// Details:
/// - The new fallback chain is used by the next lookup.
async fn integration_settings_file_reconfigures() {
    let loader = Arc::new(MemorySourceLoader::new());
    loader.insert("en", "hello: Hello\n");
    loader.insert("fr", "hello: Bonjour\n");
    let translator = Translator::with_loader(
        Settings::default(),
        Arc::clone(&loader) as Arc<dyn SourceLoader>,
    );
    let none = Placeholders::new();
    assert_eq!(translator.get_async("es", "hello", "", &none).await, "Hello");
    assert!(!translator.settings_report().configured);

    let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
    let path = temp_dir.path().join("lingocache.toml");
    fs::write(
        &path,
        "fallback_langs = [\"fr\"]\ndefault_lang = \"fr\"\ncache_ttl = 5\nlog_level = \"WARNING\"\n",
    )
    .expect("Failed to write test settings file");
    translator.configure(&load_overrides(&path).expect("settings file parses"));

    let report = translator.settings_report();
    assert!(report.configured);
    assert_eq!(report.fallback_languages, vec!["fr"]);
    assert_eq!(report.default_language, "fr");
    assert_eq!(report.cache_ttl_minutes, 5);
    assert_eq!(report.log_level, LogLevel::Warning);
    assert_eq!(translator.cache_stats().await.entries, 0);

    assert_eq!(translator.get_async("es", "hello", "", &none).await, "Bonjour");
}

#[test]
/// What: The settings report serializes with upper-case log levels.
fn integration_settings_report_json() {
    let translator = Translator::new(Settings::default());
    let json = serde_json::to_value(translator.settings_report()).expect("report serializes");
    assert_eq!(json["log_level"], "INFO");
    assert_eq!(json["default_language"], "en");
    assert_eq!(json["cache_ttl_minutes"], 30);
    assert_eq!(json["configured"], false);
}
