//! User-facing log collection
//!
//! Diagnostic output uses `tracing`; this module holds the lines that form
//! the tool's actual report.

pub mod aggregator;

pub use aggregator::{LogAggregator, LogEntry, Severity};
