//! Parsing of the raw accounts configuration string
//!
//! The value is a list of `identifier<sep>secret` entries. Entries are
//! separated by newlines, and within one line by `;` or (if the line has no
//! `;`) by `,`. Identifier and secret are separated by the first `:`, `;` or
//! `|`, tried in that order.

use crate::types::Account;

/// Separators between identifier and secret, in priority order
const PAIR_SEPARATORS: [char; 3] = [':', ';', '|'];

/// Parse the raw configuration value into accounts, preserving order.
///
/// Malformed entries are dropped silently; duplicates are kept.
pub fn parse_accounts(raw: Option<&str>) -> Vec<Account> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .flat_map(split_line)
        .filter_map(parse_entry)
        .collect()
}

/// Split one line into entries, on `;` if present, else on `,`
fn split_line(line: &str) -> Vec<&str> {
    if line.contains(';') {
        line.split(';').collect()
    } else if line.contains(',') {
        line.split(',').collect()
    } else {
        vec![line]
    }
}

fn parse_entry(entry: &str) -> Option<Account> {
    let separator = PAIR_SEPARATORS
        .iter()
        .find(|separator| entry.contains(**separator))?;
    let (identifier, secret) = entry.split_once(*separator)?;

    let identifier = identifier.trim();
    let secret = secret.trim();
    if identifier.is_empty() || secret.is_empty() {
        return None;
    }

    Some(Account::new(identifier, secret))
}
