//! Per-account check-in sessions
//!
//! This module holds the check-in state machine, the site protocol seam and
//! its reqwest implementation, and page field extraction.
//!
//! ## Flow
//!
//! 1. Fetch the login page and read the CSRF token
//! 2. Log in
//! 3. Read username, points and streak from the home page (best effort)
//! 4. Check in
//! 5. On success, wait for the site to settle and read the profile again

pub mod account;
pub mod http;
pub mod scraper;
pub mod site;
pub mod state;

pub use account::AccountSession;
pub use http::{HttpConnector, HttpSiteApi};
pub use scraper::{PageScraper, RegexScraper, Selector};
pub use site::{LoginForm, SiteApi, SiteConnector};
pub use state::{SessionState, SignOutcome};
