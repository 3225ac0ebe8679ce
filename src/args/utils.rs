//! Shared utilities for argument processing.

use lingocache::config::{LogLevel, SettingsOverrides, load_overrides};

use crate::args::{Args, CliError};

/// What: Determine the tracing filter from command-line arguments.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Filter directive (debug, info, warn, error).
///
/// Details:
/// - Verbose flag overrides --log-level.
/// - Defaults to `warn` so command output stays readable.
pub fn determine_log_level(args: &Args) -> String {
    if args.verbose {
        LogLevel::Debug.as_filter().to_string()
    } else {
        args.log_level
            .map_or("warn", LogLevel::as_filter)
            .to_string()
    }
}

/// What: Parse a `name=value` placeholder argument.
///
/// Inputs:
/// - `raw`: Argument text.
///
/// Output:
/// - `(name, value)`; the value may contain further `=` characters.
///
/// # Errors
/// - Returns a message when there is no `=` or the name is empty.
pub fn parse_placeholder(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("placeholder name missing in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

/// What: Collect settings overrides from the settings file and flags.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Overrides with flags layered over the file.
///
/// # Errors
/// - Returns `CliError::Config` when the settings file cannot be read or parsed.
pub fn collect_overrides(args: &Args) -> Result<SettingsOverrides, CliError> {
    let from_file = match &args.config {
        Some(path) => load_overrides(path)?,
        None => SettingsOverrides::default(),
    };
    let log_level = if args.verbose {
        Some(LogLevel::Debug)
    } else {
        args.log_level
    };
    let from_flags = SettingsOverrides {
        source_path: args.source_path.clone(),
        fallback_languages: args.fallback.clone(),
        default_language: args.default_lang.clone(),
        cache_ttl_minutes: args.ttl,
        logging_enabled: None,
        colored_output: args.no_color.then_some(false),
        log_level,
    };
    Ok(from_file.merged_with(from_flags))
}
