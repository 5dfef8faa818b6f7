//! Per-account check-in state machine
//!
//! ```text
//! Init ──► TokenFetched ──► LoggedIn ──► ProfileKnown ──► SignAttempted ──► Finished(SignedSuccess | AlreadySigned | SignFailed)
//!   │            │
//!   └────────────┴──► Finished(LoginFailed)
//! ```

use crate::types::{SessionStatus, SignData};

/// Substrings of the check-in message meaning "already done today"
pub const ALREADY_SIGNED_MARKERS: [&str; 2] = ["已经签到", "已签到"];

/// Result of the check-in request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOutcome {
    /// Check-in accepted; `data` may carry the new balance and streak
    Signed {
        message: String,
        data: Option<SignData>,
    },
    /// The site reports the check-in was already done today
    AlreadySigned { message: String },
    /// Rejected, unparsable, or never answered
    Failed { reason: String },
}

impl SignOutcome {
    /// Terminal status this outcome leads to
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Signed { .. } => SessionStatus::SignedSuccess,
            Self::AlreadySigned { .. } => SessionStatus::AlreadySigned,
            Self::Failed { .. } => SessionStatus::SignFailed,
        }
    }
}

/// Whether a non-success check-in message means the day is already claimed
pub fn is_already_signed(message: &str) -> bool {
    ALREADY_SIGNED_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// Where one account's run currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Init,
    TokenFetched { token: String },
    LoggedIn,
    ProfileKnown,
    SignAttempted(SignOutcome),
    Finished(SessionStatus),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::TokenFetched { .. } => "token_fetched",
            Self::LoggedIn => "logged_in",
            Self::ProfileKnown => "profile_known",
            Self::SignAttempted(_) => "sign_attempted",
            Self::Finished(_) => "finished",
        }
    }

    /// Final status once the run is over, `None` while it is still going
    pub fn terminal_status(&self) -> Option<SessionStatus> {
        match self {
            Self::Finished(status) => Some(*status),
            _ => None,
        }
    }

    /// Transition table
    pub fn can_transition_to(&self, next: &SessionState) -> bool {
        use SessionState::*;

        match (self, next) {
            (Init, TokenFetched { .. }) => true,
            (Init | TokenFetched { .. }, Finished(SessionStatus::LoginFailed)) => true,
            (TokenFetched { .. }, LoggedIn) => true,
            (LoggedIn, ProfileKnown) => true,
            (ProfileKnown, SignAttempted(_)) => true,
            (SignAttempted(outcome), Finished(status)) => outcome.status() == *status,
            (
                Init | TokenFetched { .. } | LoggedIn | ProfileKnown | SignAttempted(_)
                | Finished(_),
                _,
            ) => false,
        }
    }
}
