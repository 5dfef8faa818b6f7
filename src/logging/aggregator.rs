//! Append-only, timestamped log collected for a session or a batch
//!
//! Every line the user eventually reads (on stdout, in CI output, or in the
//! notification body) goes through a [`LogAggregator`]. Entries are rendered
//! as `[timestamp] symbol message` in append order.

use crate::utils::clock::LogClock;
use serde::Serialize;
use std::fmt;

/// Severity tag of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Symbol rendered in front of the message
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Info => "ℹ️",
            Self::Success => "✅",
            Self::Warning => "⚠️",
            Self::Error => "❌",
        }
    }
}

/// One recorded line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}",
            self.timestamp,
            self.severity.symbol(),
            self.message
        )
    }
}

/// Ordered collection of log entries
#[derive(Debug, Clone)]
pub struct LogAggregator {
    clock: LogClock,
    entries: Vec<LogEntry>,
    /// Print each line to stdout as it is appended
    echo: bool,
}

impl LogAggregator {
    /// Create a silent aggregator
    pub fn new(clock: LogClock) -> Self {
        Self {
            clock,
            entries: Vec::new(),
            echo: false,
        }
    }

    /// Create an aggregator that also prints every line to stdout
    pub fn echoing(clock: LogClock) -> Self {
        Self {
            echo: true,
            ..Self::new(clock)
        }
    }

    /// Append a line with the current timestamp
    pub fn log(&mut self, severity: Severity, message: impl Into<String>) {
        let entry = LogEntry {
            timestamp: self.clock.timestamp(),
            severity,
            message: message.into(),
        };
        if self.echo {
            println!("{}", entry);
        }
        self.entries.push(entry);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.log(Severity::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.log(Severity::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }

    /// Rendered lines in append order
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// All rendered lines joined by newlines
    pub fn content(&self) -> String {
        self.lines().join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
