//! Translation diagnostics.
//!
//! Library code reports through a [`Reporter`], which applies the
//! `logging_enabled` switch and the configured [`LogLevel`] threshold before
//! handing records to one or more [`LogSink`]s. The tracing sink is always
//! present; binaries can add a [`ConsoleSink`] to echo tagged, optionally
//! coloured lines to stdout.
//!
//! Binaries install the global subscriber with [`init_tracing`].

mod sink;
mod subscriber;

pub use sink::{ConsoleSink, LogRecord, LogSink, NoopSink, Tone, TracingSink};
pub use subscriber::{LingoTimer, init_tracing};

use std::fmt;
use std::sync::Arc;

use crate::config::{LogLevel, Settings};

/// Level-gated front end for log sinks.
#[derive(Clone)]
pub struct Reporter {
    /// Tag printed before console lines (e.g. `[TRANSLATION]`).
    prefix: &'static str,
    /// Master switch.
    enabled: bool,
    /// Lowest level that is emitted.
    threshold: LogLevel,
    /// Whether sinks may colour their output.
    colored: bool,
    /// Destinations, in emission order.
    sinks: Arc<[Arc<dyn LogSink>]>,
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("prefix", &self.prefix)
            .field("enabled", &self.enabled)
            .field("threshold", &self.threshold)
            .field("colored", &self.colored)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl Reporter {
    /// What: Create a reporter with explicit gating and sinks.
    ///
    /// Inputs:
    /// - `prefix`: Console tag such as `[TRANSLATION]`
    /// - `enabled`: Master switch
    /// - `threshold`: Lowest emitted level
    /// - `colored`: Allow coloured sink output
    /// - `sinks`: Destinations
    #[must_use]
    pub fn new(
        prefix: &'static str,
        enabled: bool,
        threshold: LogLevel,
        colored: bool,
        sinks: Vec<Arc<dyn LogSink>>,
    ) -> Self {
        Self {
            prefix,
            enabled,
            threshold,
            colored,
            sinks: sinks.into(),
        }
    }

    /// What: Build the translation reporter from settings.
    ///
    /// Inputs:
    /// - `settings`: Active settings (enabled flag, level, colour)
    /// - `extra`: Additional sinks besides tracing
    #[must_use]
    pub fn for_translations(settings: &Settings, extra: &[Arc<dyn LogSink>]) -> Self {
        let mut sinks: Vec<Arc<dyn LogSink>> = Vec::with_capacity(extra.len() + 1);
        sinks.push(Arc::new(TracingSink));
        sinks.extend(extra.iter().cloned());
        Self::new(
            "[TRANSLATION]",
            settings.logging_enabled,
            settings.log_level,
            settings.colored_output,
            sinks,
        )
    }

    /// What: A reporter that drops everything.
    #[must_use]
    pub fn silent() -> Self {
        Self::new("", false, LogLevel::Error, false, Vec::new())
    }

    /// What: Check whether a record at `level` would be emitted.
    #[must_use]
    pub fn enabled_for(&self, level: LogLevel) -> bool {
        self.enabled && self.threshold.allows(level)
    }

    /// Emit a debug record (cyan).
    pub fn debug(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Debug, Tone::Debug, message);
    }

    /// Emit an info record (green).
    pub fn info(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Info, Tone::Info, message);
    }

    /// Emit an info record in the neutral notice colour (blue).
    pub fn notice(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Info, Tone::Notice, message);
    }

    /// Emit an info record marking a successful operation (bright green).
    pub fn success(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Info, Tone::Success, message);
    }

    /// Emit an info record that should stand out (bright yellow).
    pub fn highlight(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Info, Tone::Highlight, message);
    }

    /// Emit a warning record (yellow).
    pub fn warning(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Warning, Tone::Warning, message);
    }

    /// Emit an error record (red).
    pub fn error(&self, message: impl fmt::Display) {
        self.emit(LogLevel::Error, Tone::Error, message);
    }

    fn emit(&self, level: LogLevel, tone: Tone, message: impl fmt::Display) {
        if !self.enabled_for(level) {
            return;
        }
        let message = message.to_string();
        let record = LogRecord {
            level,
            prefix: self.prefix,
            message: &message,
            tone: self.colored.then_some(tone),
        };
        for sink in self.sinks.iter() {
            sink.emit(&record);
        }
    }
}
