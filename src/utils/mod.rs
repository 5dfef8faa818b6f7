//! Utility functions and helpers
//!
//! This module contains utility functions used throughout the application.

pub mod clock;
pub mod privacy;
pub mod version;

pub use clock::{Clock, FixedClock, LogClock, SystemClock};
pub use privacy::{redact, redact_opt};
pub use version::{VERSION, get_version};
