//! Integration tests for resolution over YAML files on disk.
//!
//! Tests cover:
//! - Fallback from a malformed file to the next candidate
//! - Batch lookups over every available language
//! - Switching source directories through reconfiguration
//! - Missing source directories

#![cfg(test)]

use std::fs;
use std::path::Path;

use lingocache::config::{Settings, SettingsOverrides};
use lingocache::i18n::{Placeholders, Translator};
use tempfile::TempDir;

fn write_sources(dir: &Path, files: &[(&str, &str)]) {
    for (code, text) in files {
        fs::write(dir.join(format!("{code}.yaml")), text).expect("Failed to write test source");
    }
}

fn translator(dir: &Path, fallbacks: &[&str]) -> Translator {
    Translator::new(Settings {
        source_path: dir.to_path_buf(),
        fallback_languages: fallbacks.iter().map(|s| (*s).to_string()).collect(),
        ..Settings::default()
    })
}

#[tokio::test]
/// What: A malformed requested file falls back to the next valid file.
///
/// Inputs:
/// - `de.yaml` with broken YAML, `en.yaml` valid; chain `[en]`.
///
/// Output:
/// - German requests resolve from English, placeholders applied.
///
/// Details:
/// - The fallback tree is cached under `de`, not `en`.
async fn integration_malformed_source_falls_back() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
    write_sources(
        temp_dir.path(),
        &[
            ("de", "welcome: [unclosed\n"),
            ("en", "welcome:\n  title: \"Welcome, {user}!\"\n"),
        ],
    );
    let translator = translator(temp_dir.path(), &["en"]);

    let mut values = Placeholders::new();
    values.insert("user".to_string(), "Alice".to_string());
    let text = translator
        .get_async("de", "welcome.title", "Welcome", &values)
        .await;
    assert_eq!(text, "Welcome, Alice!");
    assert_eq!(translator.cache_stats().await.languages, vec!["de"]);
}

#[tokio::test]
/// What: Batch lookup covers every `.yaml` source and skips languages without the key.
async fn integration_batch_over_available_languages() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
    write_sources(
        temp_dir.path(),
        &[
            ("en", "settings:\n  language_name: English\n"),
            ("de", "settings:\n  language_name: Deutsch\n"),
            ("fr", "other: autre\n"),
        ],
    );
    fs::write(temp_dir.path().join("README.md"), "not a source").expect("Failed to write file");
    let translator = translator(temp_dir.path(), &[]);

    assert_eq!(
        translator.available_languages().await,
        vec!["de", "en", "fr"]
    );
    let all = translator
        .get_all_translations("settings.language_name", None)
        .await;
    assert_eq!(all.len(), 2);
    assert_eq!(all["de"], "Deutsch");
    assert_eq!(all["en"], "English");
}

#[tokio::test]
/// What: Changing the source directory keeps cached trees until they are cleared.
///
/// Inputs:
/// - Two directories with different `en.yaml` files.
///
/// Output:
/// - The cached value survives reconfiguration; after `clear_cache` the new
///   directory is read.
async fn integration_reconfigure_source_path() {
    let first = TempDir::new().expect("Failed to create temp directory for test");
    let second = TempDir::new().expect("Failed to create temp directory for test");
    write_sources(first.path(), &[("en", "hello: first\n")]);
    write_sources(second.path(), &[("en", "hello: second\n")]);
    let translator = translator(first.path(), &[]);
    let none = Placeholders::new();

    assert_eq!(translator.get_async("en", "hello", "", &none).await, "first");

    translator.configure(&SettingsOverrides {
        source_path: Some(second.path().to_path_buf()),
        ..SettingsOverrides::default()
    });
    assert_eq!(translator.get_async("en", "hello", "", &none).await, "first");

    translator.clear_cache(None).await;
    assert_eq!(translator.get_async("en", "hello", "", &none).await, "second");
    assert_eq!(
        translator.settings_report().translation_path,
        second.path().display().to_string()
    );
}

#[tokio::test]
/// What: A missing source directory lists only the default language and resolves to defaults.
async fn integration_missing_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
    let translator = translator(&temp_dir.path().join("missing"), &["en"]);

    assert_eq!(translator.available_languages().await, vec!["en"]);
    assert_eq!(
        translator
            .get_async("en", "hello", "fallback text", &Placeholders::new())
            .await,
        "fallback text"
    );
}

#[tokio::test]
/// What: A forced reload picks up edits made on disk.
async fn integration_force_reload_sees_edits() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory for test");
    write_sources(temp_dir.path(), &[("en", "hello: before\n")]);
    let translator = translator(temp_dir.path(), &[]);
    let _ = translator.load_messages("en", false).await;

    write_sources(temp_dir.path(), &[("en", "hello: after\n")]);
    let none = Placeholders::new();
    assert_eq!(translator.get_async("en", "hello", "", &none).await, "before");

    let _ = translator.load_messages("en", true).await;
    assert_eq!(translator.get_async("en", "hello", "", &none).await, "after");
}
