//! Command-line argument definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lingocache::config::LogLevel;

use crate::args::utils::parse_placeholder;

/// lingocache - cached YAML message lookup with language fallback chains
#[derive(Parser, Debug)]
#[command(name = "lingocache")]
#[command(version)]
#[command(about = "Look up, list and validate YAML translations with fallback languages", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Settings file (TOML) applied before the flags below
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding `{code}.yaml` message sources
    #[arg(long)]
    pub source_path: Option<PathBuf>,

    /// Fallback chain, comma-separated (e.g. `en,de`)
    #[arg(long, value_delimiter = ',')]
    pub fallback: Option<Vec<String>>,

    /// Language used when no preference is known
    #[arg(long)]
    pub default_lang: Option<String>,

    /// Cache time-to-live in minutes
    #[arg(long)]
    pub ttl: Option<u64>,

    /// Diagnostics level (debug, info, warning, error)
    #[arg(long)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Do not echo diagnostics to the console
    #[arg(short, long)]
    pub quiet: bool,

    /// Append tracing output to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve one key in one language
    Get {
        /// Requested language
        lang: String,
        /// Dotted key path (e.g. `welcome.title`)
        key: String,
        /// Returned when the key cannot be resolved
        #[arg(long, default_value = "")]
        default: String,
        /// Placeholder value as `name=value`; repeatable
        #[arg(long = "set", value_parser = parse_placeholder)]
        placeholders: Vec<(String, String)>,
    },
    /// Resolve one key in several languages
    All {
        /// Dotted key path
        key: String,
        /// Languages to query; repeatable (default: every available language)
        #[arg(long = "lang")]
        languages: Vec<String>,
    },
    /// Compare a language's keys against the default language
    Validate {
        /// Language to validate
        lang: String,
    },
    /// List languages that have a source file
    Languages,
    /// Show the effective settings
    Settings,
    /// Check whether a newer version is published
    VersionCheck {
        /// Running version (default: read from --version-file)
        #[arg(long)]
        current: Option<String>,
        /// File holding the running version
        #[arg(long)]
        version_file: Option<PathBuf>,
        /// URL of the plain-text latest version
        #[arg(long)]
        url: Option<String>,
        /// Repository URL, used for release notes and as the download link
        #[arg(long)]
        repo: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Ignore a cached result
        #[arg(long)]
        force: bool,
    },
}
