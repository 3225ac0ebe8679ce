//! Language resolution with fallback chain support.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::{LanguageCode, Settings, SettingsOverrides, SettingsReport};
use crate::i18n::cache::{CacheStats, SourceStamp, TranslationCache};
use crate::i18n::format::{FormatError, Placeholders, format_template};
use crate::i18n::key_path::KeyPath;
use crate::i18n::loader::{FsSourceLoader, SourceError, SourceLoader, parse_messages};
use crate::i18n::preferences::{PreferenceError, PreferenceStore};
use crate::i18n::tree::{Lookup, MessageTree};
use crate::logging::{LogSink, Reporter};

/// One consistent view of configuration, source access and cache.
///
/// Requests clone the `Arc` once and use it to the end, so a concurrent
/// reconfiguration never shows them a half-updated state.
pub(crate) struct Runtime {
    pub(crate) settings: Arc<Settings>,
    pub(crate) loader: Arc<dyn SourceLoader>,
    pub(crate) cache: Arc<TranslationCache>,
    pub(crate) reporter: Reporter,
}

/// Central translation lookup.
///
/// Resolves a requested language through the configured fallback chain,
/// caches the resulting tree under the requested code, walks key paths and
/// substitutes placeholders. Lookups never fail: the worst case is the
/// caller-supplied default.
///
/// # Example
///
/// ```rust,no_run
/// use lingocache::config::Settings;
/// use lingocache::i18n::{Placeholders, Translator};
///
/// # async fn demo() {
/// let translator = Translator::new(Settings::default());
/// let mut values = Placeholders::new();
/// values.insert("user".to_string(), "Alice".to_string());
/// let text = translator
///     .get_async("de", "welcome.title", "Welcome!", &values)
///     .await;
/// # let _ = text;
/// # }
/// ```
pub struct Translator {
    runtime: RwLock<Arc<Runtime>>,
    custom_loader: Option<Arc<dyn SourceLoader>>,
    sinks: Vec<Arc<dyn LogSink>>,
    configured: AtomicBool,
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("settings", &self.settings())
            .field("custom_loader", &self.custom_loader.is_some())
            .field("sinks", &self.sinks.len())
            .field("configured", &self.configured.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Translator {
    /// What: Create a translator reading `{source_path}/{code}.yaml` files.
    ///
    /// Inputs:
    /// - `settings`: Initial settings
    ///
    /// Details:
    /// - The cache is created immediately with the settings' TTL.
    /// - Changing `source_path` through [`Self::configure`] switches directories.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let loader: Arc<dyn SourceLoader> = Arc::new(FsSourceLoader::new(&settings.source_path));
        Self::build(settings, loader, None)
    }

    /// What: Create a translator over a custom source loader.
    ///
    /// Details:
    /// - `source_path` is only reported; the loader decides where sources live.
    #[must_use]
    pub fn with_loader(settings: Settings, loader: Arc<dyn SourceLoader>) -> Self {
        Self::build(settings, Arc::clone(&loader), Some(loader))
    }

    /// What: Add log sinks (e.g. a console echo) next to tracing.
    #[must_use]
    pub fn with_sinks(mut self, sinks: Vec<Arc<dyn LogSink>>) -> Self {
        self.sinks = sinks;
        let current = self.snapshot();
        let reporter = Reporter::for_translations(&current.settings, &self.sinks);
        *self
            .runtime
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(Runtime {
            settings: Arc::clone(&current.settings),
            loader: Arc::clone(&current.loader),
            cache: Arc::clone(&current.cache),
            reporter,
        });
        self
    }

    fn build(
        settings: Settings,
        loader: Arc<dyn SourceLoader>,
        custom_loader: Option<Arc<dyn SourceLoader>>,
    ) -> Self {
        let cache = Arc::new(TranslationCache::new(settings.cache_ttl()));
        let reporter = Reporter::for_translations(&settings, &[]);
        Self {
            runtime: RwLock::new(Arc::new(Runtime {
                settings: Arc::new(settings),
                loader,
                cache,
                reporter,
            })),
            custom_loader,
            sinks: Vec::new(),
            configured: AtomicBool::new(false),
        }
    }

    pub(crate) fn snapshot(&self) -> Arc<Runtime> {
        Arc::clone(&self.runtime.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// What: Apply explicit overrides and swap in the new configuration.
    ///
    /// Inputs:
    /// - `overrides`: Fields to change; unspecified fields keep their value
    ///
    /// Details:
    /// - A new cache is created when a TTL is supplied; otherwise the existing
    ///   cache (and its entries) is kept and its TTL refreshed for future
    ///   insertions.
    /// - The filesystem loader is rebuilt when the source path changes.
    /// - The whole snapshot is replaced in one step.
    pub fn configure(&self, overrides: &SettingsOverrides) {
        let next = {
            let mut guard = self.runtime.write().unwrap_or_else(PoisonError::into_inner);
            let current = Arc::clone(&guard);
            let settings = current.settings.apply(overrides);

            let cache = if overrides.cache_ttl_minutes.is_some() {
                Arc::new(TranslationCache::new(settings.cache_ttl()))
            } else {
                current.cache.update_ttl(settings.cache_ttl());
                Arc::clone(&current.cache)
            };

            let loader = match &self.custom_loader {
                Some(loader) => Arc::clone(loader),
                None if settings.source_path == current.settings.source_path => {
                    Arc::clone(&current.loader)
                }
                None => Arc::new(FsSourceLoader::new(&settings.source_path)),
            };

            let reporter = Reporter::for_translations(&settings, &self.sinks);
            let next = Arc::new(Runtime {
                settings: Arc::new(settings),
                loader,
                cache,
                reporter,
            });
            *guard = Arc::clone(&next);
            next
        };
        self.configured.store(true, Ordering::Relaxed);

        let settings = &next.settings;
        next.reporter.info(format_args!(
            "Translator configured: path={}, default={}, fallbacks={:?}",
            settings.source_path.display(),
            settings.default_language,
            settings.fallback_languages
        ));
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> Arc<Settings> {
        Arc::clone(&self.snapshot().settings)
    }

    /// What: Flat diagnostic view of the current configuration.
    #[must_use]
    pub fn settings_report(&self) -> SettingsReport {
        SettingsReport::new(&self.settings(), self.configured.load(Ordering::Relaxed))
    }

    /// What: Load the message tree for a language, following the fallback chain.
    ///
    /// Inputs:
    /// - `lang_code`: Requested language
    /// - `force_reload`: Bypass the cache and re-read sources
    ///
    /// Output:
    /// - Tree of the first candidate that loads; an empty tree when all fail
    ///
    /// Details:
    /// - Candidates are the requested code followed by the fallback chain.
    /// - The result is cached under `lang_code`, even when a fallback served it.
    /// - An exhausted chain caches an empty tree so repeated requests inside the
    ///   TTL window do not touch the sources again.
    pub async fn load_messages(&self, lang_code: &str, force_reload: bool) -> Arc<MessageTree> {
        self.snapshot().load(lang_code, force_reload).await
    }

    /// What: Look up a translation from an async context.
    ///
    /// Inputs:
    /// - `lang_code`: Requested language
    /// - `path`: Dotted key or explicit segments
    /// - `default`: Returned when the key cannot be resolved to a string
    /// - `placeholders`: Values for `{name}` fields
    ///
    /// Output:
    /// - Formatted translation, the unformatted template when formatting fails,
    ///   or `default`
    pub async fn get_async(
        &self,
        lang_code: &str,
        path: impl Into<KeyPath>,
        default: &str,
        placeholders: &Placeholders,
    ) -> String {
        let path = path.into();
        let runtime = self.snapshot();
        let tree = runtime.load(lang_code, false).await;
        runtime.render(&tree, &path, default, placeholders)
    }

    /// What: Look up a translation from synchronous code.
    ///
    /// Details:
    /// - Runs [`Self::get_async`] on a private current-thread runtime and
    ///   blocks until it finishes.
    /// - On a thread that already has a runtime handle (async tasks,
    ///   `spawn_blocking`), the private runtime lives on a scoped thread so
    ///   it never nests inside the caller's runtime.
    pub fn get(
        &self,
        lang_code: &str,
        path: impl Into<KeyPath>,
        default: &str,
        placeholders: &Placeholders,
    ) -> String {
        let path = path.into();
        let lookup = move || match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt.block_on(self.get_async(lang_code, path, default, placeholders)),
            Err(e) => {
                self.snapshot()
                    .reporter
                    .error(format_args!("Could not start lookup runtime: {e}"));
                default.to_string()
            }
        };

        if tokio::runtime::Handle::try_current().is_err() {
            return lookup();
        }
        std::thread::scope(|scope| scope.spawn(lookup).join()).unwrap_or_else(|_| {
            self.snapshot().reporter.error(format_args!(
                "Blocking lookup thread for '{lang_code}' panicked"
            ));
            default.to_string()
        })
    }

    /// What: Look up a translation in a user's preferred language.
    ///
    /// Details:
    /// - Missing, empty or failing preferences fall back to the default language.
    pub async fn get_for_user(
        &self,
        store: &dyn PreferenceStore,
        user_id: u64,
        path: impl Into<KeyPath>,
        default: &str,
        placeholders: &Placeholders,
    ) -> String {
        let lang = self.resolve_preference(store.user_language(user_id).await, "user");
        self.get_async(&lang, path, default, placeholders).await
    }

    /// What: Look up a translation in a guild's configured language.
    ///
    /// Details:
    /// - Missing, empty or failing preferences fall back to the default language.
    pub async fn get_for_guild(
        &self,
        store: &dyn PreferenceStore,
        guild_id: u64,
        path: impl Into<KeyPath>,
        default: &str,
        placeholders: &Placeholders,
    ) -> String {
        let lang = self.resolve_preference(store.guild_language(guild_id).await, "guild");
        self.get_async(&lang, path, default, placeholders).await
    }

    /// Stored preference, or the default language when it is unset, empty or unreadable.
    fn resolve_preference(
        &self,
        result: Result<Option<LanguageCode>, PreferenceError>,
        kind: &str,
    ) -> LanguageCode {
        let runtime = self.snapshot();
        match result {
            Ok(Some(lang)) if !lang.is_empty() => lang,
            Ok(_) => runtime.settings.default_language.clone(),
            Err(e) => {
                runtime
                    .reporter
                    .debug(format_args!("Could not fetch {kind} language: {e}"));
                runtime.settings.default_language.clone()
            }
        }
    }

    /// What: Resolve one key in several languages.
    ///
    /// Inputs:
    /// - `path`: Key to resolve
    /// - `languages`: Languages to try; `None` means every available language
    ///
    /// Output:
    /// - Map of language code to translation, containing only non-empty results
    ///
    /// Details:
    /// - Each language is resolved independently; unresolvable ones are omitted.
    pub async fn get_all_translations(
        &self,
        path: impl Into<KeyPath>,
        languages: Option<&[LanguageCode]>,
    ) -> BTreeMap<LanguageCode, String> {
        let path = path.into();
        let languages = match languages {
            Some(langs) => langs.to_vec(),
            None => self.available_languages().await,
        };
        let no_values = Placeholders::new();
        let lookups = languages.iter().map(|lang| {
            let path = path.clone();
            let no_values = &no_values;
            async move { (lang, self.get_async(lang, path, "", no_values).await) }
        });

        let runtime = self.snapshot();
        let mut results = BTreeMap::new();
        for (lang, translation) in futures::future::join_all(lookups).await {
            if translation.is_empty() {
                runtime
                    .reporter
                    .debug(format_args!("No translation of '{path}' for {lang}"));
            } else {
                results.insert(lang.clone(), translation);
            }
        }
        results
    }

    /// What: Language codes that have a source.
    ///
    /// Output:
    /// - Sorted codes; `[default_language]` when the source directory is missing
    pub async fn available_languages(&self) -> Vec<LanguageCode> {
        let runtime = self.snapshot();
        match runtime.loader.languages().await {
            Some(languages) => languages,
            None => vec![runtime.settings.default_language.clone()],
        }
    }

    /// What: Drop cached trees.
    ///
    /// Inputs:
    /// - `lang_code`: Language to clear, or `None` for all
    pub async fn clear_cache(&self, lang_code: Option<&str>) {
        let runtime = self.snapshot();
        runtime.cache.clear(lang_code).await;
        match lang_code {
            Some(lang) => runtime
                .reporter
                .info(format_args!("Cache cleared for: {lang}")),
            None => runtime.reporter.info("Cache cleared for all languages"),
        }
    }

    /// What: Current cache statistics.
    pub async fn cache_stats(&self) -> CacheStats {
        self.snapshot().cache.stats().await
    }
}

impl Runtime {
    pub(crate) async fn load(&self, lang_code: &str, force_reload: bool) -> Arc<MessageTree> {
        if !force_reload && let Some(cached) = self.cache.get(lang_code).await {
            self.reporter
                .debug(format_args!("Loaded {lang_code}.yaml from cache"));
            return cached;
        }

        let candidates = std::iter::once(lang_code)
            .chain(self.settings.fallback_languages.iter().map(String::as_str));
        for code in candidates {
            if !self.loader.exists(code).await {
                self.reporter
                    .debug(format_args!("File not found: {code}.yaml"));
                continue;
            }
            match self.load_candidate(lang_code, code, force_reload).await {
                Ok(tree) => return tree,
                Err(e @ SourceError::NotAMapping { .. }) => self.reporter.warning(e),
                Err(e) => self.reporter.error(e),
            }
        }

        self.reporter.warning(format_args!(
            "No translation file found for '{lang_code}' or fallbacks"
        ));
        let empty = Arc::new(MessageTree::new());
        self.cache.set_exhausted(lang_code, Arc::clone(&empty)).await;
        empty
    }

    async fn load_candidate(
        &self,
        requested: &str,
        code: &str,
        force_reload: bool,
    ) -> Result<Arc<MessageTree>, SourceError> {
        let modified = self.loader.modified_time(code).await?;
        if !force_reload
            && let Some(cached) = self.cache.get_if_fresh(requested, code, modified).await
        {
            self.reporter
                .debug(format_args!("Loaded {code}.yaml from cache (unchanged)"));
            return Ok(cached);
        }

        let text = self.loader.read(code).await?;
        let tree = Arc::new(parse_messages(code, &text)?);
        self.cache
            .store(
                requested,
                Arc::clone(&tree),
                SourceStamp {
                    source: code.to_string(),
                    modified,
                },
            )
            .await;

        if code == requested {
            self.reporter
                .success(format_args!("{code}.yaml has loaded"));
        } else {
            self.reporter
                .info(format_args!("{code}.yaml loaded (fallback for {requested})"));
        }
        Ok(tree)
    }

    pub(crate) fn render(
        &self,
        tree: &MessageTree,
        path: &KeyPath,
        default: &str,
        placeholders: &Placeholders,
    ) -> String {
        let template = match tree.lookup(path) {
            Lookup::Found(template) => template,
            Lookup::Missing { .. } => {
                self.reporter.debug(format_args!("Key not found: {path}"));
                return default.to_string();
            }
            Lookup::NotAMapping { at } => {
                let segment = path.segments().get(at).map_or("", String::as_str);
                self.reporter.debug(format_args!(
                    "Invalid path structure at '{segment}' in {path}"
                ));
                return default.to_string();
            }
            Lookup::NotAString => {
                self.reporter
                    .warning(format_args!("Translation at {path} is not a string"));
                return default.to_string();
            }
        };

        match format_template(template, placeholders) {
            Ok(text) => text,
            Err(FormatError::Missing(name)) => {
                self.reporter.warning(format_args!(
                    "Missing placeholder in translation: '{name}'"
                ));
                template.to_string()
            }
            Err(e) => {
                self.reporter
                    .error(format_args!("Error formatting translation: {e}"));
                template.to_string()
            }
        }
    }
}
