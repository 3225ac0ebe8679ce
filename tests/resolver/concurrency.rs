//! Integration tests for concurrent lookups and reconfiguration.

#![cfg(test)]

use std::sync::Arc;

use lingocache::config::{Settings, SettingsOverrides};
use lingocache::i18n::{MemorySourceLoader, Placeholders, SourceLoader, Translator};

fn shared_translator() -> (Arc<Translator>, Arc<MemorySourceLoader>) {
    let loader = Arc::new(MemorySourceLoader::new());
    loader.insert("en", "hello: Hello\n");
    loader.insert("de", "hello: Hallo\n");
    let translator = Translator::with_loader(
        Settings {
            fallback_languages: vec!["en".to_string()],
            ..Settings::default()
        },
        Arc::clone(&loader) as Arc<dyn SourceLoader>,
    );
    (Arc::new(translator), loader)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
/// What: Concurrent lookups for several languages all resolve correctly.
///
/// Inputs:
/// - 64 tasks alternating between `en`, `de` and `fr` (falls back to `en`).
///
/// Output:
/// - Every task sees the right text.
///
/// Details:
/// - Redundant loads are allowed; they are bounded by the number of tasks.
async fn integration_concurrent_lookups() {
    let (translator, loader) = shared_translator();
    let mut handles = Vec::new();
    for i in 0..64 {
        let translator = Arc::clone(&translator);
        let lang = ["en", "de", "fr"][i % 3];
        handles.push(tokio::spawn(async move {
            let text = translator
                .get_async(lang, "hello", "", &Placeholders::new())
                .await;
            (lang, text)
        }));
    }
    for handle in handles {
        let (lang, text) = handle.await.expect("lookup task panicked");
        let expected = if lang == "de" { "Hallo" } else { "Hello" };
        assert_eq!(text, expected, "lang {lang}");
    }
    assert!(loader.reads() <= 64);
    assert_eq!(translator.cache_stats().await.entries, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
/// What: Reconfiguring while lookups run never yields a torn result.
///
/// Inputs:
/// - Lookups of a missing key in an unknown language while the default
///   language flips between `en` and `de`.
///
/// Output:
/// - Every result is one of the two complete answers.
async fn integration_reconfigure_during_lookups() {
    let (translator, _loader) = shared_translator();
    let writer = {
        let translator = Arc::clone(&translator);
        tokio::spawn(async move {
            for i in 0..50 {
                let lang = if i % 2 == 0 { "de" } else { "en" };
                translator.configure(&SettingsOverrides {
                    default_language: Some(lang.to_string()),
                    ..SettingsOverrides::default()
                });
                tokio::task::yield_now().await;
            }
        })
    };

    let mut readers = Vec::new();
    for _ in 0..16 {
        let translator = Arc::clone(&translator);
        readers.push(tokio::spawn(async move {
            let mut seen = Vec::new();
            for _ in 0..20 {
                let settings = translator.settings();
                seen.push(settings.default_language.clone());
                let text = translator
                    .get_async("de", "hello", "", &Placeholders::new())
                    .await;
                assert_eq!(text, "Hallo");
                tokio::task::yield_now().await;
            }
            seen
        }));
    }

    writer.await.expect("writer panicked");
    for reader in readers {
        let seen = reader.await.expect("reader panicked");
        assert!(seen.iter().all(|lang| lang == "en" || lang == "de"));
    }
    assert!(translator.settings_report().configured);
}
