//! Key-completeness check of one language against the default language.

use serde::Serialize;

use crate::i18n::resolver::Translator;
use crate::i18n::tree::MessageTree;

/// Result of validating one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// False when the language has no usable translations.
    pub valid: bool,
    /// Hard errors.
    pub errors: Vec<String>,
    /// Soft findings such as missing keys.
    pub warnings: Vec<String>,
    /// Keys present in the default language but not in the target, sorted.
    pub missing_keys: Vec<String>,
    /// Keys present in the target but not in the default language, sorted.
    pub extra_keys: Vec<String>,
}

/// Missing and extra flattened keys of `target` relative to `reference`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyDiff {
    /// In `reference`, absent from `target`.
    pub missing: Vec<String>,
    /// In `target`, absent from `reference`.
    pub extra: Vec<String>,
}

/// What: Diff the flattened key sets of two trees.
///
/// Inputs:
/// - `reference`: Tree every key is expected in (usually the default language)
/// - `target`: Tree being checked
///
/// Output:
/// - Sorted missing and extra key lists
#[must_use]
pub fn compare_keys(reference: &MessageTree, target: &MessageTree) -> KeyDiff {
    let reference = reference.flatten_keys();
    let target = target.flatten_keys();
    KeyDiff {
        missing: reference.difference(&target).cloned().collect(),
        extra: target.difference(&reference).cloned().collect(),
    }
}

impl Translator {
    /// What: Check a language for completeness against the default language.
    ///
    /// Inputs:
    /// - `lang_code`: Language to validate
    ///
    /// Output:
    /// - Report with validity flag, errors, warnings and key differences
    ///
    /// Details:
    /// - The target is reloaded from its sources, bypassing the cache.
    /// - A language that resolves to an empty tree is invalid.
    /// - The default language itself is only checked for being non-empty.
    pub async fn validate_translations(&self, lang_code: &str) -> ValidationReport {
        let runtime = self.snapshot();
        let mut report = ValidationReport {
            valid: true,
            ..ValidationReport::default()
        };

        let target = runtime.load(lang_code, true).await;
        if target.is_empty() {
            report.valid = false;
            report
                .errors
                .push(format!("No translations found for '{lang_code}'"));
            return report;
        }

        let default_language = &runtime.settings.default_language;
        if lang_code != default_language {
            let reference = runtime.load(default_language, false).await;
            let diff = compare_keys(&reference, &target);
            if !diff.missing.is_empty() {
                report.warnings.push(format!(
                    "{} keys missing compared to {default_language}",
                    diff.missing.len()
                ));
            }
            report.missing_keys = diff.missing;
            report.extra_keys = diff.extra;
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::i18n::loader::{MemorySourceLoader, SourceLoader, parse_messages};
    use std::sync::Arc;

    #[test]
    /// What: Flattened diff reports keys only the reference has.
    ///
    /// Inputs:
    /// - Reference `{a: {b, c}}`, target `{a: {b}}`.
    ///
    /// Output:
    /// - Missing `a.c`; nothing extra.
    fn compare_reports_missing_key() {
        let reference = parse_messages("en", "a:\n  b: '1'\n  c: '2'\n").expect("valid");
        let target = parse_messages("de", "a:\n  b: '1'\n").expect("valid");

        assert_eq!(
            reference.flatten_keys().into_iter().collect::<Vec<_>>(),
            vec!["a.b", "a.c"]
        );
        let diff = compare_keys(&reference, &target);
        assert_eq!(diff.missing, vec!["a.c"]);
        assert!(diff.extra.is_empty());

        let reverse = compare_keys(&target, &reference);
        assert!(reverse.missing.is_empty());
        assert_eq!(reverse.extra, vec!["a.c"]);
    }

    fn translator(loader: &Arc<MemorySourceLoader>) -> Translator {
        Translator::with_loader(
            Settings {
                fallback_languages: Vec::new(),
                ..Settings::default()
            },
            Arc::clone(loader) as Arc<dyn SourceLoader>,
        )
    }

    #[tokio::test]
    /// What: Validation against the default language lists sorted differences.
    async fn validate_lists_differences() {
        let loader = Arc::new(MemorySourceLoader::new());
        loader.insert("en", "menu:\n  open: Open\n  close: Close\n  save: Save\n");
        loader.insert("de", "menu:\n  open: Öffnen\n  quit: Beenden\n");
        let translator = translator(&loader);

        let report = translator.validate_translations("de").await;
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert_eq!(report.missing_keys, vec!["menu.close", "menu.save"]);
        assert_eq!(report.extra_keys, vec!["menu.quit"]);
        assert_eq!(report.warnings, vec!["2 keys missing compared to en"]);
    }

    #[tokio::test]
    /// What: A language without any source is invalid; the default language is not diffed.
    async fn validate_empty_and_default() {
        let loader = Arc::new(MemorySourceLoader::new());
        loader.insert("en", "menu:\n  open: Open\n");
        let translator = translator(&loader);

        let missing = translator.validate_translations("fr").await;
        assert!(!missing.valid);
        assert_eq!(missing.errors, vec!["No translations found for 'fr'"]);

        let default = translator.validate_translations("en").await;
        assert!(default.valid);
        assert!(default.missing_keys.is_empty());
        assert!(default.warnings.is_empty());
    }

    #[tokio::test]
    /// What: Validation re-reads the target even when it is cached.
    async fn validate_forces_reload() {
        let loader = Arc::new(MemorySourceLoader::new());
        loader.insert("en", "a: A\nb: B\n");
        loader.insert("de", "a: A\n");
        let translator = translator(&loader);
        let _ = translator.load_messages("de", false).await;

        loader.insert("de", "a: A\nb: B\n");
        let report = translator.validate_translations("de").await;
        assert!(report.missing_keys.is_empty());
    }
}
