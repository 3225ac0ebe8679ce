//! Integration tests for the version checker through its public API.
//!
//! Tests cover:
//! - Update detection and release notes
//! - Status rendering of a live report
//! - Version details of the running build

#![cfg(test)]

use std::sync::Arc;

use async_trait::async_trait;
use lingocache::update::{
    ReleaseType, UpdateError, UpdateSettings, VersionChecker, VersionSource, render_status,
};

/// Fixed remote answer.
struct FixedSource {
    latest: &'static str,
    notes: &'static str,
}

#[async_trait]
impl VersionSource for FixedSource {
    async fn latest_version(&self) -> Result<String, UpdateError> {
        Ok(self.latest.to_string())
    }

    async fn release_notes(&self, version: &str) -> Result<Option<String>, UpdateError> {
        Ok(Some(format!("{version}: {}", self.notes)))
    }
}

fn settings() -> UpdateSettings {
    UpdateSettings {
        auto_check_on_start: false,
        show_console_output: false,
        ..UpdateSettings::default().with_repository("https://github.com/acme/bot")
    }
}

#[tokio::test]
/// What: An older running version reports the update with notes and download link.
///
/// Inputs:
/// - Running `1.7.2-alpha`, published `1.8.0`.
///
/// Output:
/// - `update_available`, notes for `1.8.0`, plain rendering lists both versions.
async fn integration_update_available() {
    let source = Arc::new(FixedSource {
        latest: "1.8.0",
        notes: "New dashboard",
    });
    let checker = VersionChecker::new(Some("1.7.2-alpha"), settings(), source)
        .expect("version supplied");

    let report = checker.check_for_updates(false).await;
    assert!(report.update_available);
    assert_eq!(report.latest_version.as_deref(), Some("1.8.0"));
    assert_eq!(report.release_notes.as_deref(), Some("1.8.0: New dashboard"));
    assert_eq!(report.download_url, "https://github.com/acme/bot");

    let text = render_status(&report, false);
    assert!(text.contains("  Current: 1.7.2-alpha"));
    assert!(text.contains("  Latest:  1.8.0"));
    assert!(text.contains("1.8.0: New dashboard..."));
}

#[tokio::test]
/// What: Version details describe the running build; printing returns the report.
async fn integration_version_details() {
    let source = Arc::new(FixedSource {
        latest: "2.0.0",
        notes: "",
    });
    let checker =
        VersionChecker::new(Some("2.0.0-beta"), settings(), source).expect("version supplied");

    let details = checker.version_info();
    assert_eq!(details.release_type, ReleaseType::Beta);
    assert_eq!((details.major, details.minor, details.patch), (2, 0, 0));
    assert!(details.is_prerelease);

    let report = checker.print_update_status().await;
    assert!(report.is_prerelease);
    assert!(report.release_notes.is_none());
    assert!(render_status(&report, false).contains("[PRE-RELEASE] Running 2.0.0-beta"));
}
