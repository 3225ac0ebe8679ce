//! Update checker settings.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::config::LogLevel;

const DEFAULT_REPOSITORY: &str = "https://github.com/Oppro-net-Development/ManagerX";
const DEFAULT_VERSION_URL: &str =
    "https://raw.githubusercontent.com/Oppro-net-Development/ManagerX/main/config/version.txt";

/// What: Derive the REST API base of a GitHub repository URL.
///
/// Inputs:
/// - `repository_url`: e.g. `https://github.com/user/repo`
///
/// Output:
/// - e.g. `https://api.github.com/repos/user/repo`
#[must_use]
pub fn api_url_for(repository_url: &str) -> String {
    let path = repository_url
        .trim_end_matches('/')
        .trim_start_matches("https://github.com/");
    format!("https://api.github.com/repos/{path}")
}

/// Configuration of a [`super::VersionChecker`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateSettings {
    /// Repository page, also reported as the download URL.
    pub repository_url: String,
    /// API base used for release notes.
    pub api_url: String,
    /// Plain-text file holding the latest version.
    pub version_url: String,
    /// Local file holding the current version, read when none is supplied.
    pub version_file: Option<PathBuf>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Minimum hours between non-forced checks.
    pub check_interval_hours: u64,
    /// Master switch for diagnostics.
    pub logging_enabled: bool,
    /// Colour console output.
    pub colored_output: bool,
    /// Lowest emitted level.
    pub log_level: LogLevel,
    /// Run one delayed check right after construction.
    pub auto_check_on_start: bool,
    /// Echo diagnostics and status boxes to stdout.
    pub show_console_output: bool,
    /// Log when running a build newer than the published one.
    pub notify_dev_builds: bool,
    /// Log when running a pre-release of the published version.
    pub notify_prereleases: bool,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            repository_url: DEFAULT_REPOSITORY.to_string(),
            api_url: api_url_for(DEFAULT_REPOSITORY),
            version_url: DEFAULT_VERSION_URL.to_string(),
            version_file: None,
            timeout_secs: 10,
            check_interval_hours: 24,
            logging_enabled: true,
            colored_output: true,
            log_level: LogLevel::Info,
            auto_check_on_start: true,
            show_console_output: true,
            notify_dev_builds: true,
            notify_prereleases: true,
        }
    }
}

impl UpdateSettings {
    /// What: Point at another repository, deriving its API URL.
    #[must_use]
    pub fn with_repository(mut self, repository_url: impl Into<String>) -> Self {
        self.repository_url = repository_url.into();
        self.api_url = api_url_for(&self.repository_url);
        self
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Minimum interval between non-forced checks.
    #[must_use]
    pub const fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_hours.saturating_mul(3600))
    }
}
