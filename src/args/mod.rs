//! Command-line argument parsing and handling.

pub mod commands;
pub mod definition;
pub mod utils;

use std::process::ExitCode;
use std::sync::Arc;

use lingocache::config::{ConfigError, Settings};
use lingocache::i18n::Translator;
use lingocache::logging::{ConsoleSink, LogSink};
use lingocache::update::UpdateError;
use thiserror::Error;

// Re-export commonly used items
pub use definition::{Args, Command};
pub use utils::determine_log_level;

/// Failures that end a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings file problem.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Update check could not start.
    #[error(transparent)]
    Update(#[from] UpdateError),
    /// JSON output failed.
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// What: Build the translator and dispatch the selected subcommand.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Process exit code.
///
/// # Errors
/// - Returns `CliError` for settings-file, update-check setup or output failures.
pub async fn run(args: &Args) -> Result<ExitCode, CliError> {
    let overrides = utils::collect_overrides(args)?;
    let sinks: Vec<Arc<dyn LogSink>> = if args.quiet || args.json {
        Vec::new()
    } else {
        vec![Arc::new(ConsoleSink)]
    };
    let translator = Translator::new(Settings::default()).with_sinks(sinks);
    translator.configure(&overrides);
    let colored = translator.settings().colored_output;

    match &args.command {
        Command::Get {
            lang,
            key,
            default,
            placeholders,
        } => commands::handle_get(&translator, args.json, lang, key, default, placeholders).await,
        Command::All { key, languages } => {
            commands::handle_all(&translator, args.json, key, languages).await
        }
        Command::Validate { lang } => commands::handle_validate(&translator, args.json, lang).await,
        Command::Languages => commands::handle_languages(&translator, args.json).await,
        Command::Settings => commands::handle_settings(&translator, args.json),
        Command::VersionCheck {
            current,
            version_file,
            url,
            repo,
            timeout,
            force,
        } => {
            let options = commands::VersionCheckOptions {
                current: current.clone(),
                version_file: version_file.clone(),
                url: url.clone(),
                repo: repo.clone(),
                timeout: *timeout,
                force: *force,
            };
            commands::handle_version_check(options, args.json, colored, args.quiet).await
        }
    }
}
