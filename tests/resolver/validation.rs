//! Integration tests for translation validation against the default language.

#![cfg(test)]

use std::fs;

use lingocache::config::{Settings, SettingsOverrides};
use lingocache::i18n::Translator;
use tempfile::TempDir;

#[tokio::test]
/// What: Validation reports missing and extra keys from files on disk.
///
/// Inputs:
/// - `en.yaml` (default) and `de.yaml` with one key missing and one extra.
///
/// Output:
/// - Valid report listing the differences; JSON shape uses snake_case fields.
async fn integration_validate_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
    fs::write(
        temp_dir.path().join("en.yaml"),
        "a:\n  b: \"1\"\n  c: \"2\"\nd: \"3\"\n",
    )
    .expect("Failed to write test source");
    fs::write(temp_dir.path().join("de.yaml"), "a:\n  b: \"1\"\nd: \"3\"\ne: \"4\"\n")
        .expect("Failed to write test source");
    let translator = Translator::new(Settings {
        source_path: temp_dir.path().to_path_buf(),
        fallback_languages: Vec::new(),
        ..Settings::default()
    });

    let report = translator.validate_translations("de").await;
    assert!(report.valid);
    assert_eq!(report.missing_keys, vec!["a.c"]);
    assert_eq!(report.extra_keys, vec!["e"]);
    assert_eq!(report.warnings, vec!["1 keys missing compared to en"]);

    let json = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(json["missing_keys"][0], "a.c");
    assert_eq!(json["valid"], true);
}

#[tokio::test]
/// What: Validating against a reconfigured default language uses that language.
async fn integration_validate_after_default_change() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
    fs::write(temp_dir.path().join("en.yaml"), "a: A\nb: B\n").expect("write");
    fs::write(temp_dir.path().join("de.yaml"), "a: A\n").expect("write");
    let translator = Translator::new(Settings {
        source_path: temp_dir.path().to_path_buf(),
        fallback_languages: Vec::new(),
        ..Settings::default()
    });

    translator.configure(&SettingsOverrides {
        default_language: Some("de".to_string()),
        ..SettingsOverrides::default()
    });
    let report = translator.validate_translations("en").await;
    assert!(report.missing_keys.is_empty());
    assert_eq!(report.extra_keys, vec!["b"]);
    assert!(report.warnings.is_empty());
}
