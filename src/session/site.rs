//! Upstream site protocol seam
//!
//! [`SiteApi`] is the four requests a check-in needs. Every implementation
//! owns its own cookie jar, so one instance serves exactly one account;
//! [`SiteConnector`] hands out a fresh instance per account.

use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Site paths, relative to the configured base URL
pub mod paths {
    pub const LOGIN: &str = "/site/login";
    pub const HOME: &str = "/";
    pub const SIGN: &str = "/user/sign";
}

/// Form-encoded login request body
#[derive(Clone, Serialize)]
pub struct LoginForm {
    #[serde(rename = "_csrf")]
    pub csrf: String,
    pub email: String,
    pub password: String,
    pub remember: &'static str,
}

impl LoginForm {
    pub fn new(
        csrf: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            csrf: csrf.into(),
            email: email.into(),
            password: password.into(),
            remember: "off",
        }
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("csrf", &self.csrf)
            .field("email", &crate::utils::redact(&self.email))
            .field("password", &"<redacted>")
            .field("remember", &self.remember)
            .finish()
    }
}

/// Requests issued during one account's check-in.
///
/// Each method returns the response body of a 2xx answer. Non-2xx answers are
/// [`Error::Protocol`](crate::Error::Protocol); network failures are
/// [`Error::Transport`](crate::Error::Transport).
#[async_trait]
pub trait SiteApi: Send + Sync {
    /// GET the login page
    async fn login_page(&self) -> Result<String>;

    /// POST the login form
    async fn submit_login(&self, form: &LoginForm) -> Result<String>;

    /// GET the home page of the logged-in user
    async fn home_page(&self) -> Result<String>;

    /// GET the check-in endpoint
    async fn check_in(&self) -> Result<String>;
}

/// Factory for per-account [`SiteApi`] instances
pub trait SiteConnector: Send + Sync {
    /// A new session with an empty cookie jar
    fn connect(&self) -> Result<Box<dyn SiteApi>>;
}
