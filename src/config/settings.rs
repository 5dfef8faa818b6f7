//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the check-in tool.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default environment variable holding the raw account list
pub const DEFAULT_ACCOUNTS_ENV: &str = "ABLESCI_ACCOUNTS";

/// Main configuration settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Upstream site configuration
    pub site: SiteSettings,
    /// Account source configuration
    pub accounts: AccountSettings,
    /// Notification configuration
    pub notify: NotifySettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Upstream site and HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Base URL every site path is resolved against
    pub base_url: String,
    /// Browser User-Agent sent with every request
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Pause after a successful check-in before re-reading the profile
    pub settle_delay_ms: u64,
}

/// Where accounts come from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSettings {
    /// Environment variable holding the raw account list
    pub env_var: String,
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifySettings {
    /// Webhook endpoint; notifications are disabled when unset
    pub webhook_url: Option<String>,
    /// Title attached to every notification
    pub title: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Diagnostic log level for stderr output
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
    /// Constant shift applied to UTC for log timestamps
    pub utc_offset_hours: i32,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.ablesci.com".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36".to_string(),
            timeout_secs: 30,
            settle_delay_ms: 2000,
        }
    }
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            env_var: DEFAULT_ACCOUNTS_ENV.to_string(),
        }
    }
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            webhook_url: None,
            title: crate::batch::DEFAULT_TITLE.to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            verbose: false,
            utc_offset_hours: 8,
        }
    }
}

impl SiteSettings {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Settling delay as a duration
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Settings {
    /// Load settings from a TOML file; missing sections fall back to defaults
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Apply environment variable overrides.
    ///
    /// A variable that does not parse is skipped; the returned list names
    /// every skipped variable.
    pub fn merge_with_env(&mut self) -> Vec<String> {
        self.merge_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn merge_with<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ignored = Vec::new();

        if let Some(base_url) = lookup("ABLESCI_BASE_URL") {
            self.site.base_url = base_url;
        }

        if let Some(timeout) = lookup("ABLESCI_TIMEOUT") {
            match timeout.trim().parse() {
                Ok(secs) => self.site.timeout_secs = secs,
                Err(e) => ignored.push(format!("ignoring ABLESCI_TIMEOUT={:?}: {}", timeout, e)),
            }
        }

        if let Some(delay) = lookup("ABLESCI_SETTLE_DELAY_MS") {
            match delay.trim().parse() {
                Ok(ms) => self.site.settle_delay_ms = ms,
                Err(e) => ignored.push(format!(
                    "ignoring ABLESCI_SETTLE_DELAY_MS={:?}: {}",
                    delay, e
                )),
            }
        }

        if let Some(url) = lookup("ABLESCI_NOTIFY_URL")
            && !url.trim().is_empty()
        {
            self.notify.webhook_url = Some(url);
        }

        if let Some(title) = lookup("ABLESCI_NOTIFY_TITLE") {
            self.notify.title = title;
        }

        if let Some(offset) = lookup("ABLESCI_UTC_OFFSET") {
            match offset.trim().parse() {
                Ok(hours) => self.logging.utc_offset_hours = hours,
                Err(e) => ignored.push(format!("ignoring ABLESCI_UTC_OFFSET={:?}: {}", offset, e)),
            }
        }

        ignored
    }

    /// Reset every value the runtime cannot work with to its default.
    ///
    /// Returns one message per reset field.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut reset = Vec::new();
        let site = SiteSettings::default();

        if let Err(e) = url::Url::parse(&self.site.base_url) {
            reset.push(format!(
                "invalid base_url {:?} ({}), using {}",
                self.site.base_url, e, site.base_url
            ));
            self.site.base_url = site.base_url;
        }

        if self.site.timeout_secs == 0 {
            reset.push(format!(
                "timeout must be at least one second, using {}",
                site.timeout_secs
            ));
            self.site.timeout_secs = site.timeout_secs;
        }

        if !(-23..=23).contains(&self.logging.utc_offset_hours) {
            let default = LoggingSettings::default().utc_offset_hours;
            reset.push(format!(
                "UTC offset out of range: {}, using {}",
                self.logging.utc_offset_hours, default
            ));
            self.logging.utc_offset_hours = default;
        }

        if self.accounts.env_var.trim().is_empty() {
            reset.push(format!(
                "accounts env_var must not be empty, using {}",
                DEFAULT_ACCOUNTS_ENV
            ));
            self.accounts.env_var = DEFAULT_ACCOUNTS_ENV.to_string();
        }

        if let Some(url) = &self.notify.webhook_url
            && let Err(e) = url::Url::parse(url)
        {
            reset.push(format!(
                "invalid webhook_url ({}), notifications disabled",
                e
            ));
            self.notify.webhook_url = None;
        }

        reset
    }
}
