//! Type definitions for the check-in tool
//!
//! This module contains the account, response and result data structures.

pub mod account;
pub mod response;
pub mod result;
pub mod serde_helpers;

pub use account::Account;
pub use response::{ApiResponse, SignData};
pub use result::{
    BatchResult, NotificationOutcome, Profile, SessionResult, SessionStatus, should_suppress,
};
