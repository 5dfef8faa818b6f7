//! Outcome types for one account and for a whole batch

use serde::Serialize;
use std::fmt;

/// Terminal status of one account's run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    LoginFailed,
    SignFailed,
    AlreadySigned,
    SignedSuccess,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::LoginFailed => "login failed",
            Self::SignFailed => "check-in failed",
            Self::AlreadySigned => "already checked in",
            Self::SignedSuccess => "checked in",
        };
        f.write_str(label)
    }
}

/// Profile values scraped from the home page or returned by a check-in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub username: Option<String>,
    pub points: Option<String>,
    pub sign_days: Option<String>,
}

/// Everything one account's run produced
#[derive(Debug, Clone, Serialize)]
pub struct SessionResult {
    pub status: SessionStatus,
    pub username: Option<String>,
    pub points: Option<String>,
    pub sign_days: Option<String>,
    /// Rendered log lines in append order
    pub log_lines: Vec<String>,
}

impl SessionResult {
    pub fn new(status: SessionStatus, profile: Profile, log_lines: Vec<String>) -> Self {
        Self {
            status,
            username: profile.username,
            points: profile.points,
            sign_days: profile.sign_days,
            log_lines,
        }
    }

    /// Log lines joined by newlines
    pub fn log(&self) -> String {
        self.log_lines.join("\n")
    }
}

/// What happened to the notification at the end of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationOutcome {
    Sent,
    Failed,
    /// No notifier configured
    Disabled,
    /// Every account was already checked in
    Suppressed,
}

/// Results of one batch, in input order
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub sessions: Vec<SessionResult>,
    pub suppress_notification: bool,
    pub notification: NotificationOutcome,
    /// Full report: per-account logs separated by blank lines, or the batch
    /// log when there was nothing to process. Configuration problems, if
    /// any, come first.
    pub log: String,
}

impl BatchResult {
    /// Statuses in input order
    pub fn statuses(&self) -> Vec<SessionStatus> {
        self.sessions.iter().map(|s| s.status).collect()
    }
}

/// True iff there is at least one status and all of them are `AlreadySigned`
pub fn should_suppress(statuses: &[SessionStatus]) -> bool {
    !statuses.is_empty()
        && statuses
            .iter()
            .all(|status| *status == SessionStatus::AlreadySigned)
}
