//! Cached update checks against a [`VersionSource`].

use std::cmp::Ordering;
use std::sync::{Arc, Mutex as StdMutex, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::logging::{ConsoleSink, LogSink, Reporter, TracingSink};
use crate::update::UpdateError;
use crate::update::settings::UpdateSettings;
use crate::update::source::VersionSource;
use crate::update::version::{ReleaseType, VersionInfo};

/// Delay before the startup check runs.
pub const STARTUP_CHECK_DELAY: Duration = Duration::from_secs(2);

/// Outcome of one update check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    /// The published version is newer.
    pub update_available: bool,
    /// Running version as supplied.
    pub current_version: String,
    /// Published version, when it could be fetched.
    pub latest_version: Option<String>,
    /// Running a pre-release of the published stable version.
    pub is_prerelease: bool,
    /// Running something newer than the published version.
    pub is_dev_build: bool,
    /// Notes of the published release, fetched only when an update is available.
    pub release_notes: Option<String>,
    /// Where to get the update.
    pub download_url: String,
    /// Why the check failed.
    pub error: Option<String>,
    /// When the check ran.
    pub checked_at: DateTime<Local>,
}

/// Details of the running version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDetails {
    /// Version as supplied.
    pub version: String,
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
    /// Release channel.
    pub release_type: ReleaseType,
    /// No suffix.
    pub is_stable: bool,
    /// Alpha, beta or dev.
    pub is_prerelease: bool,
}

#[derive(Debug)]
struct CachedReport {
    at: Instant,
    report: UpdateReport,
}

/// Compares the running version with the latest published one.
pub struct VersionChecker {
    current: VersionInfo,
    settings: UpdateSettings,
    source: Arc<dyn VersionSource>,
    reporter: Reporter,
    cached: Mutex<Option<CachedReport>>,
    startup: StdMutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for VersionChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionChecker")
            .field("current", &self.current)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl VersionChecker {
    /// What: Create a checker for the running version.
    ///
    /// Inputs:
    /// - `current`: Running version; read from `settings.version_file` when `None`
    /// - `settings`: Checker settings
    /// - `source`: Where the latest version comes from
    ///
    /// Output:
    /// - Shared checker
    ///
    /// # Errors
    /// - Returns `UpdateError::NoVersion` when no version is supplied and none can be read
    ///
    /// Details:
    /// - With `auto_check_on_start` and a running tokio runtime, schedules one check
    ///   after [`STARTUP_CHECK_DELAY`]. The task holds only a weak reference.
    pub fn new(
        current: Option<&str>,
        settings: UpdateSettings,
        source: Arc<dyn VersionSource>,
    ) -> Result<Arc<Self>, UpdateError> {
        let mut sinks: Vec<Arc<dyn LogSink>> = vec![Arc::new(TracingSink)];
        if settings.show_console_output {
            sinks.push(Arc::new(ConsoleSink));
        }
        Self::with_sinks(current, settings, source, sinks)
    }

    /// What: Like [`Self::new`] with explicit log sinks.
    ///
    /// # Errors
    /// - Returns `UpdateError::NoVersion` when no version is supplied and none can be read
    pub fn with_sinks(
        current: Option<&str>,
        settings: UpdateSettings,
        source: Arc<dyn VersionSource>,
        sinks: Vec<Arc<dyn LogSink>>,
    ) -> Result<Arc<Self>, UpdateError> {
        let reporter = Reporter::new(
            "[UPDATE]",
            settings.logging_enabled,
            settings.log_level,
            settings.colored_output,
            sinks,
        );
        let raw = match current {
            Some(version) => version.to_string(),
            None => read_version_file(&settings, &reporter).ok_or(UpdateError::NoVersion)?,
        };
        let current = parse_logged(&raw, &reporter);
        reporter.debug(format_args!(
            "VersionChecker initialized with version {current}"
        ));

        let auto_check = settings.auto_check_on_start;
        let checker = Arc::new(Self {
            current,
            settings,
            source,
            reporter,
            cached: Mutex::new(None),
            startup: StdMutex::new(None),
        });

        if auto_check && let Ok(handle) = tokio::runtime::Handle::try_current() {
            let weak = Arc::downgrade(&checker);
            let task = handle.spawn(startup_check(weak));
            *checker
                .startup
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(task);
        }
        Ok(checker)
    }

    /// What: Take the handle of the scheduled startup check, if any.
    pub fn take_startup_check(&self) -> Option<JoinHandle<()>> {
        self.startup
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Running version.
    #[must_use]
    pub const fn current_version(&self) -> &VersionInfo {
        &self.current
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &UpdateSettings {
        &self.settings
    }

    /// What: Structured details of the running version.
    #[must_use]
    pub fn version_info(&self) -> VersionDetails {
        VersionDetails {
            version: self.current.to_string(),
            major: self.current.major,
            minor: self.current.minor,
            patch: self.current.patch,
            release_type: self.current.release_type,
            is_stable: self.current.is_stable(),
            is_prerelease: self.current.is_prerelease(),
        }
    }

    /// What: Check whether a newer version is published.
    ///
    /// Inputs:
    /// - `force`: Ignore a cached result younger than the check interval
    ///
    /// Output:
    /// - Report; on fetch failure `error` is set and nothing is cached
    pub async fn check_for_updates(&self, force: bool) -> UpdateReport {
        self.reporter.debug("Checking for updates...");
        let mut cached = self.cached.lock().await;
        if !force && let Some(entry) = cached.as_ref() {
            let age = entry.at.elapsed();
            if age < self.settings.check_interval() {
                self.reporter.debug(format_args!(
                    "Using cached result (checked {:.1}h ago)",
                    age.as_secs_f64() / 3600.0
                ));
                return entry.report.clone();
            }
        }

        let Some(latest) = self.fetch_latest_version().await else {
            return UpdateReport {
                update_available: false,
                current_version: self.current.to_string(),
                latest_version: None,
                is_prerelease: false,
                is_dev_build: false,
                release_notes: None,
                download_url: self.settings.repository_url.clone(),
                error: Some("Could not fetch latest version".to_string()),
                checked_at: Local::now(),
            };
        };

        let (update_available, is_dev_build, is_prerelease) = self.classify(&latest);
        let release_notes = if update_available {
            self.fetch_release_notes(&latest.to_string()).await
        } else {
            None
        };

        let report = UpdateReport {
            update_available,
            current_version: self.current.to_string(),
            latest_version: Some(latest.to_string()),
            is_prerelease,
            is_dev_build,
            release_notes,
            download_url: self.settings.repository_url.clone(),
            error: None,
            checked_at: Local::now(),
        };
        *cached = Some(CachedReport {
            at: Instant::now(),
            report: report.clone(),
        });
        report
    }

    /// Returns `(update_available, is_dev_build, is_prerelease)`.
    fn classify(&self, latest: &VersionInfo) -> (bool, bool, bool) {
        let current = &self.current;
        match current.cmp_core(latest) {
            Ordering::Greater => {
                if self.settings.notify_dev_builds {
                    self.reporter
                        .info(format_args!("Running dev build: {current} > {latest}"));
                }
                (false, true, false)
            }
            Ordering::Less => {
                self.reporter
                    .highlight(format_args!("Update available: {current} → {latest}"));
                (true, false, false)
            }
            Ordering::Equal if current.is_prerelease() && latest.is_stable() => {
                if self.settings.notify_prereleases {
                    self.reporter.info(format_args!(
                        "Running pre-release: {current} (stable: {latest})"
                    ));
                }
                (false, false, true)
            }
            Ordering::Equal => {
                self.reporter.success(format_args!("Up to date: {current}"));
                (false, false, false)
            }
        }
    }

    async fn fetch_latest_version(&self) -> Option<VersionInfo> {
        self.reporter.debug(format_args!(
            "Fetching latest version from {}",
            self.settings.version_url
        ));
        match self.source.latest_version().await {
            Ok(raw) => {
                let version = parse_logged(&raw, &self.reporter);
                self.reporter
                    .success(format_args!("Latest version fetched: {version}"));
                Some(version)
            }
            Err(e) => {
                self.reporter.error(e);
                None
            }
        }
    }

    async fn fetch_release_notes(&self, version: &str) -> Option<String> {
        match self.source.release_notes(version).await {
            Ok(notes) => {
                if notes.is_some() {
                    self.reporter.debug("Release notes fetched successfully");
                }
                notes
            }
            Err(e) => {
                self.reporter
                    .debug(format_args!("Could not fetch release notes: {e}"));
                None
            }
        }
    }
}

async fn startup_check(checker: Weak<VersionChecker>) {
    tokio::time::sleep(STARTUP_CHECK_DELAY).await;
    let Some(checker) = checker.upgrade() else {
        return;
    };
    let report = checker.check_for_updates(false).await;
    if let Some(error) = report.error {
        checker
            .reporter
            .debug(format_args!("Auto-check failed: {error}"));
    }
}

fn parse_logged(raw: &str, reporter: &Reporter) -> VersionInfo {
    VersionInfo::try_parse(raw).unwrap_or_else(|| {
        reporter.warning(format_args!("Invalid version format: {raw}"));
        VersionInfo::parse_or_unknown(raw)
    })
}

fn read_version_file(settings: &UpdateSettings, reporter: &Reporter) -> Option<String> {
    let path = settings.version_file.as_ref()?;
    if !path.exists() {
        reporter.warning(format_args!("Version file not found: {}", path.display()));
        return None;
    }
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let version = text.trim().to_string();
            reporter.debug(format_args!("Read version from file: {version}"));
            Some(version)
        }
        Err(e) => {
            reporter.error(format_args!("Error reading version file: {e}"));
            None
        }
    }
}
