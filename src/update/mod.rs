//! Update notifications: compare the running version with the latest published one.
//!
//! Versions look like `MAJOR.MINOR.PATCH[-TYPE]` with `TYPE` one of `dev`, `beta`
//! or `alpha`. The latest version is read from a plain-text URL; release notes
//! come from the GitHub releases API.

mod checker;
mod settings;
mod source;
mod status;
mod version;

pub use checker::{STARTUP_CHECK_DELAY, UpdateReport, VersionChecker, VersionDetails};
pub use settings::{UpdateSettings, api_url_for};
pub use source::{HttpVersionSource, VersionSource};
pub use status::{RELEASE_NOTES_PREVIEW, render_status};
pub use version::{ReleaseType, VersionInfo};

use thiserror::Error;

/// Update check failures.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// No running version was supplied and none could be read from the version file.
    #[error("No version provided and auto-read failed; supply a version or configure a version file")]
    NoVersion,
    /// The HTTP client could not be built.
    #[error("Could not create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// Transport or decoding failure.
    #[error("Unexpected error fetching version: {0}")]
    Http(#[source] reqwest::Error),
    /// Non-success status.
    #[error("Version check failed: HTTP {0}")]
    Status(u16),
    /// The request exceeded the configured timeout.
    #[error("Version check timed out after {secs}s")]
    Timeout {
        /// Configured timeout.
        secs: u64,
    },
    /// The host could not be reached.
    #[error("Could not connect to the version host (network issue)")]
    Connect,
    /// The version file was empty.
    #[error("Empty version response")]
    Empty,
}
