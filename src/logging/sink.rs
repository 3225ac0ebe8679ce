//! Log destinations.

use crossterm::style::Stylize;

use crate::config::LogLevel;

/// Colour hint attached to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Cyan.
    Debug,
    /// Green.
    Info,
    /// Blue.
    Notice,
    /// Bright green.
    Success,
    /// Bright yellow.
    Highlight,
    /// Yellow.
    Warning,
    /// Red.
    Error,
}

/// One diagnostic line handed to sinks.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    /// Severity.
    pub level: LogLevel,
    /// Component tag, e.g. `[TRANSLATION]`.
    pub prefix: &'a str,
    /// Message text without the tag.
    pub message: &'a str,
    /// Colour hint; `None` when colour output is disabled.
    pub tone: Option<Tone>,
}

/// Destination for diagnostic records. Implementations must not panic.
pub trait LogSink: Send + Sync {
    /// What: Deliver one record.
    fn emit(&self, record: &LogRecord<'_>);
}

/// Forwards records to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, record: &LogRecord<'_>) {
        let prefix = record.prefix;
        let message = record.message;
        match record.level {
            LogLevel::Debug => tracing::debug!(component = prefix, "{message}"),
            LogLevel::Info => tracing::info!(component = prefix, "{message}"),
            LogLevel::Warning => tracing::warn!(component = prefix, "{message}"),
            LogLevel::Error => tracing::error!(component = prefix, "{message}"),
        }
    }
}

/// Prints `PREFIX message` lines to stdout, coloured when a tone is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// What: Render the console line for a record.
    ///
    /// Output:
    /// - `"{prefix} {message}"`, with the prefix wrapped in ANSI colour codes when
    ///   the record carries a tone
    #[must_use]
    pub fn render(record: &LogRecord<'_>) -> String {
        let Some(tone) = record.tone else {
            return format!("{} {}", record.prefix, record.message);
        };
        let prefix = record.prefix;
        let tag = match tone {
            Tone::Debug => prefix.cyan().to_string(),
            Tone::Info => prefix.green().to_string(),
            Tone::Notice => prefix.blue().to_string(),
            Tone::Success => prefix.green().bold().to_string(),
            Tone::Highlight => prefix.yellow().bold().to_string(),
            Tone::Warning => prefix.yellow().to_string(),
            Tone::Error => prefix.red().to_string(),
        };
        format!("{tag} {}", record.message)
    }
}

impl LogSink for ConsoleSink {
    fn emit(&self, record: &LogRecord<'_>) {
        println!("{}", Self::render(record));
    }
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn emit(&self, _record: &LogRecord<'_>) {}
}
