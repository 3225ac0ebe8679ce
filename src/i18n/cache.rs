//! Time-limited cache of resolved message trees.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::LanguageCode;
use crate::i18n::tree::MessageTree;

/// Which source served a cached tree, and how fresh it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStamp {
    /// Language whose source was actually read.
    pub source: LanguageCode,
    /// Modification time of that source when it was read.
    pub modified: SystemTime,
}

/// Cache statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of stored entries, expired ones included until they are next read.
    pub entries: usize,
    /// Cached language codes, sorted.
    pub languages: Vec<LanguageCode>,
    /// Wall-clock time of the oldest insertion.
    pub oldest_entry: Option<DateTime<Local>>,
}

#[derive(Debug)]
struct CacheEntry {
    tree: Arc<MessageTree>,
    inserted_at: Instant,
    inserted_wall: DateTime<Local>,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= self.ttl
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<LanguageCode, CacheEntry>,
    stamps: HashMap<LanguageCode, SourceStamp>,
}

impl CacheState {
    /// Fetch a live entry, evicting it (and its stamp) when expired.
    fn live(&mut self, lang: &str) -> Option<Arc<MessageTree>> {
        let expired = self.entries.get(lang)?.is_expired(Instant::now());
        if expired {
            self.entries.remove(lang);
            self.stamps.remove(lang);
            tracing::debug!(lang, "cache entry expired");
            return None;
        }
        self.entries.get(lang).map(|e| Arc::clone(&e.tree))
    }

    fn insert(&mut self, lang: &str, tree: Arc<MessageTree>, ttl: Duration) {
        self.entries.insert(
            lang.to_string(),
            CacheEntry {
                tree,
                inserted_at: Instant::now(),
                inserted_wall: Local::now(),
                ttl,
            },
        );
    }
}

/// Language-keyed cache with per-entry time-to-live.
///
/// Every read and write goes through one exclusive lock for the whole cache,
/// so lookups for different languages also serialize. Expiry is lazy: stale
/// entries are dropped when they are next read. Each entry keeps the TTL that
/// was in force when it was stored.
#[derive(Debug)]
pub struct TranslationCache {
    state: Mutex<CacheState>,
    ttl_millis: AtomicU64,
}

impl TranslationCache {
    /// What: Create an empty cache.
    ///
    /// Inputs:
    /// - `ttl`: Lifetime of entries stored from now on
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            ttl_millis: AtomicU64::new(duration_millis(ttl)),
        }
    }

    /// TTL applied to entries stored from now on.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_millis.load(Ordering::Relaxed))
    }

    /// What: Change the TTL for future insertions.
    ///
    /// Details:
    /// - Entries already stored keep the TTL they were stored with.
    pub fn update_ttl(&self, ttl: Duration) {
        self.ttl_millis.store(duration_millis(ttl), Ordering::Relaxed);
    }

    /// What: Return the cached tree for `lang` if present and unexpired.
    ///
    /// Details:
    /// - An expired entry is removed as a side effect and reported as absent.
    pub async fn get(&self, lang: &str) -> Option<Arc<MessageTree>> {
        self.state.lock().await.live(lang)
    }

    /// What: Store `tree` under `lang`, replacing any previous entry.
    ///
    /// Details:
    /// - The source stamp for `lang` is left untouched; use [`Self::store`] to
    ///   record which source produced the tree.
    pub async fn set(&self, lang: &str, tree: Arc<MessageTree>) {
        let ttl = self.ttl();
        self.state.lock().await.insert(lang, tree, ttl);
    }

    /// What: Store `tree` under `lang` together with the stamp of the source it came from.
    ///
    /// Inputs:
    /// - `lang`: Requested language (cache key)
    /// - `tree`: Parsed tree
    /// - `stamp`: Source language and modification time that produced `tree`
    pub async fn store(&self, lang: &str, tree: Arc<MessageTree>, stamp: SourceStamp) {
        let ttl = self.ttl();
        let mut state = self.state.lock().await;
        state.insert(lang, tree, ttl);
        state.stamps.insert(lang.to_string(), stamp);
    }

    /// What: Store the empty result of an exhausted fallback chain under `lang`.
    ///
    /// Details:
    /// - Drops any recorded stamp so no source can later vouch for the empty tree.
    pub async fn set_exhausted(&self, lang: &str, tree: Arc<MessageTree>) {
        let ttl = self.ttl();
        let mut state = self.state.lock().await;
        state.insert(lang, tree, ttl);
        state.stamps.remove(lang);
    }

    /// What: Return the cached tree for `lang` only if it was produced by `source`
    /// at modification time `modified`.
    ///
    /// Output:
    /// - `Some(tree)` when the entry is live and the recorded stamp matches exactly
    pub async fn get_if_fresh(
        &self,
        lang: &str,
        source: &str,
        modified: SystemTime,
    ) -> Option<Arc<MessageTree>> {
        let mut state = self.state.lock().await;
        let matches = state
            .stamps
            .get(lang)
            .is_some_and(|s| s.source == source && s.modified == modified);
        if !matches {
            return None;
        }
        state.live(lang)
    }

    /// What: Recorded source stamp for `lang`.
    pub async fn stamp(&self, lang: &str) -> Option<SourceStamp> {
        self.state.lock().await.stamps.get(lang).cloned()
    }

    /// What: Remove one entry (and its stamp) or everything.
    ///
    /// Inputs:
    /// - `lang`: Language to clear, or `None` for all
    pub async fn clear(&self, lang: Option<&str>) {
        let mut state = self.state.lock().await;
        match lang {
            Some(lang) => {
                state.entries.remove(lang);
                state.stamps.remove(lang);
            }
            None => {
                state.entries.clear();
                state.stamps.clear();
            }
        }
    }

    /// What: Snapshot of entry count, cached languages and oldest insertion.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let mut languages: Vec<LanguageCode> = state.entries.keys().cloned().collect();
        languages.sort();
        CacheStats {
            entries: state.entries.len(),
            languages,
            oldest_entry: state.entries.values().map(|e| e.inserted_wall).min(),
        }
    }
}

fn duration_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(key: &str, text: &str) -> Arc<MessageTree> {
        Arc::new(MessageTree::new().with_text(key, text))
    }

    #[tokio::test(start_paused = true)]
    /// What: Entries are absent from `inserted + ttl` onwards.
    ///
    /// Inputs:
    /// - Entry stored with a 60 s TTL; clock advanced to 59 s, then to 60 s.
    ///
    /// Output:
    /// - Present at 59 s, absent (and evicted) at exactly 60 s.
    async fn ttl_expiry_is_inclusive() {
        let cache = TranslationCache::new(Duration::from_secs(60));
        cache.set("en", tree("a", "1")).await;

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get("en").await.is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("en").await.is_none());
        assert_eq!(cache.stats().await.entries, 0);
    }

    #[tokio::test(start_paused = true)]
    /// What: A TTL change only applies to entries stored afterwards.
    async fn ttl_update_is_not_retroactive() {
        let cache = TranslationCache::new(Duration::from_secs(60));
        cache.set("en", tree("a", "1")).await;
        cache.update_ttl(Duration::from_secs(600));
        cache.set("de", tree("a", "2")).await;

        tokio::time::advance(Duration::from_secs(120)).await;
        assert!(cache.get("en").await.is_none());
        assert!(cache.get("de").await.is_some());
        assert_eq!(cache.ttl(), Duration::from_secs(600));
    }

    #[tokio::test]
    /// What: Setting a language replaces its entry instead of merging.
    async fn set_replaces_entry() {
        let cache = TranslationCache::new(Duration::from_secs(60));
        cache.set("en", tree("a", "1")).await;
        cache.set("en", tree("b", "2")).await;

        let cached = cache.get("en").await.expect("entry should be cached");
        assert!(cached.get("a").is_none());
        assert!(cached.get("b").is_some());
    }

    #[tokio::test]
    /// What: Fresh lookups require a matching source and modification time.
    async fn get_if_fresh_checks_stamp() {
        let cache = TranslationCache::new(Duration::from_secs(60));
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        cache
            .store(
                "es",
                tree("a", "1"),
                SourceStamp {
                    source: "en".to_string(),
                    modified,
                },
            )
            .await;

        assert!(cache.get_if_fresh("es", "en", modified).await.is_some());
        assert!(cache.get_if_fresh("es", "es", modified).await.is_none());
        assert!(
            cache
                .get_if_fresh("es", "en", modified + Duration::from_secs(1))
                .await
                .is_none()
        );
        assert_eq!(
            cache.stamp("es").await.map(|s| s.source),
            Some("en".to_string())
        );
    }

    #[tokio::test]
    /// What: Caching an exhausted result forgets the previous source stamp.
    async fn set_exhausted_drops_stamp() {
        let cache = TranslationCache::new(Duration::from_secs(60));
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        cache
            .store(
                "fr",
                tree("a", "1"),
                SourceStamp {
                    source: "en".to_string(),
                    modified,
                },
            )
            .await;

        cache.set_exhausted("fr", Arc::new(MessageTree::new())).await;
        assert!(cache.stamp("fr").await.is_none());
        assert!(cache.get_if_fresh("fr", "en", modified).await.is_none());
        assert!(cache.get("fr").await.is_some_and(|t| t.is_empty()));
    }

    #[tokio::test]
    /// What: Clearing one language keeps the others; clearing all empties the cache.
    async fn clear_one_and_all() {
        let cache = TranslationCache::new(Duration::from_secs(60));
        cache.set("en", tree("a", "1")).await;
        cache.set("de", tree("a", "2")).await;

        cache.clear(Some("en")).await;
        let stats = cache.stats().await;
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.languages, vec!["de".to_string()]);
        assert!(stats.oldest_entry.is_some());

        cache.clear(None).await;
        let stats = cache.stats().await;
        assert_eq!(stats.entries, 0);
        assert!(stats.languages.is_empty());
        assert!(stats.oldest_entry.is_none());
    }
}
