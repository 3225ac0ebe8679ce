//! Message source access and YAML parsing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use thiserror::Error;

use crate::config::LanguageCode;
use crate::i18n::tree::MessageTree;

/// File extension of message sources.
pub const SOURCE_EXTENSION: &str = "yaml";

/// Default budget for reading one source file.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure while loading one language source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Stat or read failed.
    #[error("Error loading {code}.yaml: {source}")]
    Io {
        /// Language whose source failed.
        code: LanguageCode,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The read did not finish within the loader's budget.
    #[error("Error loading {code}.yaml: read timed out after {after:?}")]
    Timeout {
        /// Language whose source timed out.
        code: LanguageCode,
        /// Budget that was exceeded.
        after: Duration,
    },
    /// The text is not valid YAML.
    #[error("YAML parsing error in {code}.yaml: {source}")]
    Parse {
        /// Language whose source failed to parse.
        code: LanguageCode,
        /// Underlying parser error.
        #[source]
        source: serde_norway::Error,
    },
    /// The document root is a list or scalar instead of a mapping.
    #[error("Invalid YAML structure in {code}.yaml")]
    NotAMapping {
        /// Language whose source has the wrong shape.
        code: LanguageCode,
    },
}

/// Durable storage of per-language message sources.
///
/// Implementations keep no cache of their own and must tolerate repeated calls.
#[async_trait]
pub trait SourceLoader: Send + Sync {
    /// What: Check whether a source exists for `code`.
    async fn exists(&self, code: &str) -> bool;

    /// What: Last modification time of the source for `code`.
    ///
    /// # Errors
    /// - Returns `SourceError::Io` when the source cannot be inspected
    async fn modified_time(&self, code: &str) -> Result<SystemTime, SourceError>;

    /// What: Raw text of the source for `code`.
    ///
    /// # Errors
    /// - Returns `SourceError::Io` or `SourceError::Timeout` when the source cannot be read
    async fn read(&self, code: &str) -> Result<String, SourceError>;

    /// What: Language codes that have a source, sorted.
    ///
    /// Output:
    /// - `None` when the source collection itself is missing
    async fn languages(&self) -> Option<Vec<LanguageCode>>;
}

/// What: Parse source text into a message tree.
///
/// Inputs:
/// - `code`: Language the text belongs to (for error messages)
/// - `text`: Raw YAML text
///
/// Output:
/// - `MessageTree`; empty or null documents yield an empty tree
///
/// # Errors
/// - Returns `SourceError::Parse` when the YAML is malformed
/// - Returns `SourceError::NotAMapping` when the root is not a mapping
pub fn parse_messages(code: &str, text: &str) -> Result<MessageTree, SourceError> {
    if text.trim().is_empty() {
        return Ok(MessageTree::new());
    }
    let doc: serde_norway::Value =
        serde_norway::from_str(text).map_err(|source| SourceError::Parse {
            code: code.to_string(),
            source,
        })?;
    match doc {
        serde_norway::Value::Null => Ok(MessageTree::new()),
        serde_norway::Value::Mapping(mapping) => Ok(MessageTree::from_mapping(mapping)),
        serde_norway::Value::Tagged(tagged) => match tagged.value {
            serde_norway::Value::Mapping(mapping) => Ok(MessageTree::from_mapping(mapping)),
            _ => Err(SourceError::NotAMapping {
                code: code.to_string(),
            }),
        },
        _ => Err(SourceError::NotAMapping {
            code: code.to_string(),
        }),
    }
}

/// What: Check whether a file stem looks like a language code.
///
/// Inputs:
/// - `code`: Candidate code (e.g. "en", "pt-BR")
///
/// Output:
/// - `true` for 1..=20 alphanumeric characters with inner, non-repeated hyphens
#[must_use]
pub fn is_valid_language_code(code: &str) -> bool {
    if code.is_empty() || code.len() > 20 {
        return false;
    }

    code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !code.starts_with('-')
        && !code.ends_with('-')
        && !code.contains("--")
}

/// Reads `{dir}/{code}.yaml` files.
#[derive(Debug, Clone)]
pub struct FsSourceLoader {
    dir: PathBuf,
    read_timeout: Duration,
}

impl FsSourceLoader {
    /// What: Create a loader for a source directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// What: Override the per-read time budget.
    #[must_use]
    pub const fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Source directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// What: Path of the source file for `code`.
    #[must_use]
    pub fn path_for(&self, code: &str) -> PathBuf {
        self.dir.join(format!("{code}.{SOURCE_EXTENSION}"))
    }

    fn io_error(code: &str, source: std::io::Error) -> SourceError {
        SourceError::Io {
            code: code.to_string(),
            source,
        }
    }
}

#[async_trait]
impl SourceLoader for FsSourceLoader {
    async fn exists(&self, code: &str) -> bool {
        let path = self.path_for(code);
        tokio::fs::try_exists(&path).await.unwrap_or(false)
    }

    async fn modified_time(&self, code: &str) -> Result<SystemTime, SourceError> {
        let meta = tokio::fs::metadata(self.path_for(code))
            .await
            .map_err(|e| Self::io_error(code, e))?;
        meta.modified().map_err(|e| Self::io_error(code, e))
    }

    async fn read(&self, code: &str) -> Result<String, SourceError> {
        let path = self.path_for(code);
        match tokio::time::timeout(self.read_timeout, tokio::fs::read_to_string(&path)).await {
            Ok(result) => result.map_err(|e| Self::io_error(code, e)),
            Err(_) => Err(SourceError::Timeout {
                code: code.to_string(),
                after: self.read_timeout,
            }),
        }
    }

    async fn languages(&self) -> Option<Vec<LanguageCode>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await.ok()?;
        let mut codes = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let path = entry.path();
                    if path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
                        continue;
                    }
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                        && is_valid_language_code(stem)
                    {
                        codes.push(stem.to_string());
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(
                        dir = %self.dir.display(),
                        error = %e,
                        "stopped listing message sources"
                    );
                    break;
                }
            }
        }
        codes.sort();
        Some(codes)
    }
}

/// One in-memory source.
#[derive(Debug, Clone)]
struct MemorySource {
    text: String,
    modified: SystemTime,
}

/// In-memory message sources, e.g. translations embedded in the binary.
///
/// Keeps simple access counters so callers can observe how often the
/// resolver actually touched the sources.
#[derive(Debug, Default)]
pub struct MemorySourceLoader {
    sources: Mutex<HashMap<LanguageCode, MemorySource>>,
    existence_checks: AtomicUsize,
    reads: AtomicUsize,
}

impl MemorySourceLoader {
    /// Empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What: Add or replace the source for `code`, stamping the current time.
    pub fn insert(&self, code: impl Into<LanguageCode>, text: impl Into<String>) {
        self.insert_with_time(code, text, SystemTime::now());
    }

    /// What: Add or replace the source for `code` with an explicit modification time.
    pub fn insert_with_time(
        &self,
        code: impl Into<LanguageCode>,
        text: impl Into<String>,
        modified: SystemTime,
    ) {
        self.lock().insert(
            code.into(),
            MemorySource {
                text: text.into(),
                modified,
            },
        );
    }

    /// What: Drop the source for `code`.
    pub fn remove(&self, code: &str) {
        self.lock().remove(code);
    }

    /// Number of `exists` calls so far.
    #[must_use]
    pub fn existence_checks(&self) -> usize {
        self.existence_checks.load(Ordering::Relaxed)
    }

    /// Number of `read` calls so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<LanguageCode, MemorySource>> {
        self.sources
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn not_found(code: &str) -> SourceError {
        SourceError::Io {
            code: code.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such source"),
        }
    }
}

#[async_trait]
impl SourceLoader for MemorySourceLoader {
    async fn exists(&self, code: &str) -> bool {
        self.existence_checks.fetch_add(1, Ordering::Relaxed);
        self.lock().contains_key(code)
    }

    async fn modified_time(&self, code: &str) -> Result<SystemTime, SourceError> {
        self.lock()
            .get(code)
            .map(|s| s.modified)
            .ok_or_else(|| Self::not_found(code))
    }

    async fn read(&self, code: &str) -> Result<String, SourceError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.lock()
            .get(code)
            .map(|s| s.text.clone())
            .ok_or_else(|| Self::not_found(code))
    }

    async fn languages(&self) -> Option<Vec<LanguageCode>> {
        let mut codes: Vec<LanguageCode> = self.lock().keys().cloned().collect();
        codes.sort();
        Some(codes)
    }
}
