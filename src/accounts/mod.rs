//! Account configuration
//!
//! Turns the raw accounts value into an ordered list of [`Account`]s.
//!
//! [`Account`]: crate::types::Account

pub mod parser;

pub use parser::parse_accounts;

use crate::types::Account;

/// Read and parse accounts from the named environment variable
pub fn accounts_from_env(var: &str) -> Vec<Account> {
    let raw = std::env::var(var).ok();
    let accounts = parse_accounts(raw.as_deref());
    tracing::debug!("Parsed {} account(s) from ${}", accounts.len(), var);
    accounts
}
