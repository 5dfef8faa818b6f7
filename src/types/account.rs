//! Account credentials

use std::fmt;

/// One (identifier, secret) pair taken from configuration
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    /// Login identifier, usually an email address
    pub identifier: String,
    /// Password
    pub secret: String,
}

impl Account {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    /// Both identifier and secret are present
    pub fn has_credentials(&self) -> bool {
        !self.identifier.is_empty() && !self.secret.is_empty()
    }

    /// Identifier safe for log output
    pub fn masked_identifier(&self) -> String {
        crate::utils::redact(&self.identifier)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("identifier", &self.masked_identifier())
            .field("secret", &"<redacted>")
            .finish()
    }
}
