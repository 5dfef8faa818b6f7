//! AbleSci daily check-in
//!
//! Logs in to one or more AbleSci accounts, claims the daily check-in reward
//! and reports what happened.
//!
//! # Architecture
//!
//! - **accounts**: parses the raw `ABLESCI_ACCOUNTS` value
//! - **session**: the per-account state machine and the site protocol
//! - **batch**: runs accounts sequentially and decides whether to notify
//! - **logging**: timestamped, severity-tagged report lines
//! - **notify**: outbound notification seam
//!
//! # Usage
//!
//! ```bash
//! ABLESCI_ACCOUNTS="alice@example.com:pw1
//! bob@example.com:pw2" ablesci-checkin
//! ```
//!
//! # Examples
//!
//! ```rust
//! use ablesci_checkin::accounts::parse_accounts;
//! use ablesci_checkin::utils::redact;
//!
//! let accounts = parse_accounts(Some("alice@example.com:pw1\nbob@example.com|pw2"));
//! assert_eq!(accounts.len(), 2);
//! assert_eq!(redact(&accounts[1].identifier), "bo***@example.com");
//! ```

pub mod accounts;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod session;
pub mod types;
pub mod utils;

pub use batch::BatchRunner;
pub use config::Settings;
pub use error::{Error, Result};
pub use session::AccountSession;
pub use types::{Account, BatchResult, SessionResult, SessionStatus};
