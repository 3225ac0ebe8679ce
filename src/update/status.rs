//! Console rendering of update reports.

use std::fmt::Write as _;

use crossterm::style::Stylize;

use crate::update::checker::{UpdateReport, VersionChecker};

/// Release notes are cut to this many characters on the console.
pub const RELEASE_NOTES_PREVIEW: usize = 300;

/// What: Render a report as console text.
///
/// Inputs:
/// - `report`: Result of a check
/// - `colored`: Emit ANSI colours
///
/// Output:
/// - Multi-line text, starting and ending with a blank line
#[must_use]
pub fn render_status(report: &UpdateReport, colored: bool) -> String {
    let current = report.current_version.as_str();
    let mut out = String::new();

    if let Some(error) = &report.error {
        let tag = if colored {
            "[UPDATE CHECK FAILED]".red().bold().to_string()
        } else {
            "[UPDATE CHECK FAILED]".to_string()
        };
        let _ = writeln!(out, "\n{tag} {error}");
        return out;
    }
    let latest = report.latest_version.as_deref().unwrap_or_default();

    if report.update_available {
        if colored {
            for line in [
                "╔══════════════════════════════════════╗",
                "║     UPDATE AVAILABLE                 ║",
                "╚══════════════════════════════════════╝",
            ] {
                let _ = writeln!(out, "{}", line.yellow().bold());
            }
            let _ = writeln!(out, "  Current: {}", current.red());
            let _ = writeln!(out, "  Latest:  {}", latest.green().bold());
            let _ = writeln!(out, "  Download: {}", report.download_url.as_str().cyan());
        } else {
            let rule = "=".repeat(40);
            let _ = writeln!(out, "{rule}\nUPDATE AVAILABLE\n{rule}");
            let _ = writeln!(out, "  Current: {current}");
            let _ = writeln!(out, "  Latest:  {latest}");
            let _ = writeln!(out, "  Download: {}", report.download_url);
        }
        if let Some(notes) = &report.release_notes {
            let preview: String = notes.chars().take(RELEASE_NOTES_PREVIEW).collect();
            if colored {
                let _ = writeln!(out, "\n{}", "Release Notes:".bold());
                let _ = writeln!(out, "{}", format!("{preview}...").white());
            } else {
                let _ = writeln!(out, "\nRelease Notes:\n{preview}...");
            }
        }
    } else if report.is_dev_build {
        if colored {
            let _ = writeln!(
                out,
                "{} Running {} (newer than public {})",
                "[DEV BUILD]".cyan().bold(),
                current.cyan(),
                latest.yellow()
            );
        } else {
            let _ = writeln!(out, "[DEV BUILD] Running {current} (newer than public {latest})");
        }
    } else if report.is_prerelease {
        if colored {
            let _ = writeln!(
                out,
                "{} Running {} (latest stable: {})",
                "[PRE-RELEASE]".yellow(),
                current.yellow(),
                latest.green()
            );
        } else {
            let _ = writeln!(out, "[PRE-RELEASE] Running {current} (latest stable: {latest})");
        }
    } else if colored {
        let _ = writeln!(
            out,
            "{} Running latest version: {}",
            "✓ UP TO DATE".green().bold(),
            current.green()
        );
    } else {
        let _ = writeln!(out, "[UP TO DATE] Running latest version: {current}");
    }
    format!("\n{out}")
}

impl VersionChecker {
    /// What: Check for updates (cached) and print the status to stdout.
    ///
    /// Output:
    /// - The report, printed only when `show_console_output` is set
    pub async fn print_update_status(&self) -> UpdateReport {
        let report = self.check_for_updates(false).await;
        if self.settings().show_console_output {
            println!("{}", render_status(&report, self.settings().colored_output));
        }
        report
    }
}
