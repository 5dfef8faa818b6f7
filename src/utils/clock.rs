//! Time source for log timestamps
//!
//! Log lines carry the wall clock shifted by a constant number of hours
//! (the site's users read times in UTC+8). The shift is a fixed offset, not a
//! timezone lookup, and the underlying instant comes from an injectable
//! [`Clock`] so tests can pin it.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::fmt;
use std::sync::Arc;

/// Timestamp layout used in every log line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the current instant
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// Process wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A clock plus the constant display offset
#[derive(Clone)]
pub struct LogClock {
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
}

impl LogClock {
    /// Build a log clock; offsets outside ±23 hours fall back to UTC
    pub fn new(clock: Arc<dyn Clock>, offset_hours: i32) -> Self {
        let offset = offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                tracing::warn!("UTC offset {}h out of range, using UTC", offset_hours);
                Utc.fix()
            });
        Self { clock, offset }
    }

    /// Wall clock shifted by `offset_hours`
    pub fn system(offset_hours: i32) -> Self {
        Self::new(Arc::new(SystemClock), offset_hours)
    }

    /// Current shifted time
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now().with_timezone(&self.offset)
    }

    /// Current shifted time rendered with [`TIMESTAMP_FORMAT`]
    pub fn timestamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }
}

impl Default for LogClock {
    fn default() -> Self {
        Self::system(8)
    }
}

impl fmt::Debug for LogClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogClock")
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}
