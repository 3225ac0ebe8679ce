//! Integration tests for the blocking lookup entry point.

#![cfg(test)]

use std::sync::Arc;

use lingocache::config::Settings;
use lingocache::i18n::{MemorySourceLoader, Placeholders, SourceLoader, Translator};

fn translator() -> Translator {
    let loader = Arc::new(MemorySourceLoader::new());
    loader.insert("en", "errors:\n  not_found: \"{item} was not found\"\n");
    Translator::with_loader(Settings::default(), loader as Arc<dyn SourceLoader>)
}

#[test]
/// What: Synchronous callers get formatted translations.
fn integration_blocking_get() {
    let translator = translator();
    let mut values = Placeholders::new();
    values.insert("item".to_string(), "Channel".to_string());
    assert_eq!(
        translator.get("en", "errors.not_found", "", &values),
        "Channel was not found"
    );
    assert_eq!(
        translator.get("en", ["errors", "missing"], "n/a", &values),
        "n/a"
    );
}

#[test]
/// What: The blocking entry point works from several plain threads at once.
fn integration_blocking_from_threads() {
    let translator = Arc::new(translator());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let translator = Arc::clone(&translator);
            std::thread::spawn(move || {
                let mut values = Placeholders::new();
                values.insert("item".to_string(), format!("item-{i}"));
                translator.get("en", "errors.not_found", "", &values)
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(
            handle.join().expect("thread panicked"),
            format!("item-{i} was not found")
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
/// What: Synchronous code on a `spawn_blocking` thread resolves translations.
///
/// Inputs:
/// - Blocking lookup of `errors.not_found` from inside `spawn_blocking`.
///
/// Output:
/// - The formatted translation, not the default.
async fn integration_blocking_from_spawn_blocking() {
    let translator = Arc::new(translator());
    let shared = Arc::clone(&translator);
    let text = tokio::task::spawn_blocking(move || {
        let mut values = Placeholders::new();
        values.insert("item".to_string(), "Role".to_string());
        shared.get("en", "errors.not_found", "DEFAULT", &values)
    })
    .await
    .expect("blocking task panicked");
    assert_eq!(text, "Role was not found");
}
