//! Sequential multi-account orchestration
//!
//! Accounts run one after another, in configuration order, each with its own
//! [`SiteApi`](crate::session::SiteApi) instance. A failed account only
//! affects its own [`SessionResult`]. Once every account is done the runner
//! decides whether the outcome is worth a notification.

use crate::{
    config::Settings,
    logging::LogAggregator,
    notify::Notifier,
    session::{
        AccountSession, HttpConnector, PageScraper, RegexScraper, SiteConnector,
        account::DEFAULT_SETTLE_DELAY,
    },
    types::{
        Account, BatchResult, NotificationOutcome, Profile, SessionResult, SessionStatus,
        should_suppress,
    },
    utils::clock::LogClock,
};
use std::sync::Arc;
use std::time::Duration;

/// Default notification title
pub const DEFAULT_TITLE: &str = "AbleSci Check-in";

/// Runs every account and dispatches the summary notification
pub struct BatchRunner<C: SiteConnector> {
    connector: C,
    notifier: Option<Arc<dyn Notifier>>,
    scraper: Arc<dyn PageScraper>,
    clock: LogClock,
    title: String,
    accounts_env: String,
    settle_delay: Duration,
    echo: bool,
    config_warnings: Vec<String>,
}

impl BatchRunner<HttpConnector> {
    /// Runner talking to the real site as configured, echoing to stdout
    pub fn from_settings(settings: &Settings, notifier: Option<Arc<dyn Notifier>>) -> Self {
        BatchRunner::new(
            HttpConnector::new(settings.site.clone()),
            LogClock::system(settings.logging.utc_offset_hours),
        )
        .with_notifier(notifier)
        .with_title(settings.notify.title.clone())
        .with_accounts_env(settings.accounts.env_var.clone())
        .with_settle_delay(settings.site.settle_delay())
        .with_echo(true)
    }
}

impl<C: SiteConnector> BatchRunner<C> {
    pub fn new(connector: C, clock: LogClock) -> Self {
        Self {
            connector,
            notifier: None,
            scraper: Arc::new(RegexScraper),
            clock,
            title: DEFAULT_TITLE.to_string(),
            accounts_env: crate::config::DEFAULT_ACCOUNTS_ENV.to_string(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            echo: false,
            config_warnings: Vec::new(),
        }
    }

    pub fn with_notifier(mut self, notifier: Option<Arc<dyn Notifier>>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_scraper(mut self, scraper: Arc<dyn PageScraper>) -> Self {
        self.scraper = scraper;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Variable name quoted in the configuration-error hint
    pub fn with_accounts_env(mut self, var: impl Into<String>) -> Self {
        self.accounts_env = var.into();
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Print log lines to stdout as they are produced
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Configuration problems to put at the top of the report
    pub fn with_config_warnings(mut self, warnings: Vec<String>) -> Self {
        self.config_warnings = warnings;
        self
    }

    fn new_log(&self) -> LogAggregator {
        if self.echo {
            LogAggregator::echoing(self.clock.clone())
        } else {
            LogAggregator::new(self.clock.clone())
        }
    }

    /// Process `accounts` in order and notify if anything noteworthy happened
    pub async fn run(&self, accounts: &[Account]) -> BatchResult {
        let mut batch_log = self.new_log();
        batch_log.info("AbleSci multi-account check-in started");

        let mut notices = self.new_log();
        for warning in &self.config_warnings {
            notices.warning(format!("Configuration problem: {}", warning));
        }

        if accounts.is_empty() {
            return self.report_missing_accounts(notices, batch_log).await;
        }

        let total = accounts.len();
        batch_log.info(format!("Found {} account(s)", total));

        let mut sessions = Vec::with_capacity(total);
        for (index, account) in accounts.iter().enumerate() {
            batch_log.info(format!(
                "===== Processing account {}/{} =====",
                index + 1,
                total
            ));
            let result = self.run_account(account).await;
            batch_log.info(format!(
                "===== Finished account {}/{}: {} =====",
                index + 1,
                total,
                result.status
            ));
            sessions.push(result);
        }

        batch_log.info("===== All accounts processed =====");

        let full_log = (!notices.is_empty())
            .then(|| notices.content())
            .into_iter()
            .chain(sessions.iter().map(SessionResult::log))
            .collect::<Vec<_>>()
            .join("\n\n");

        let statuses: Vec<SessionStatus> = sessions.iter().map(|s| s.status).collect();
        let suppress_notification = should_suppress(&statuses);

        let notification = if suppress_notification {
            batch_log.info("All accounts were already checked in today, skipping notification");
            NotificationOutcome::Suppressed
        } else {
            self.dispatch(&mut batch_log, &full_log).await
        };

        BatchResult {
            sessions,
            suppress_notification,
            notification,
            log: full_log,
        }
    }

    /// Configuration-error path: always attempts a notification
    async fn report_missing_accounts(
        &self,
        notices: LogAggregator,
        mut batch_log: LogAggregator,
    ) -> BatchResult {
        batch_log.error("No valid account configuration found");
        batch_log.warning(format!(
            "Set the {} environment variable, formatted as email1:password1 (one account per line)",
            self.accounts_env
        ));

        let report = |batch_log: &LogAggregator| {
            notices
                .lines()
                .into_iter()
                .chain(batch_log.lines())
                .collect::<Vec<_>>()
                .join("\n")
        };

        let body = report(&batch_log);
        let notification = self.dispatch(&mut batch_log, &body).await;

        BatchResult {
            sessions: Vec::new(),
            suppress_notification: false,
            notification,
            log: report(&batch_log),
        }
    }

    async fn run_account(&self, account: &Account) -> SessionResult {
        let mut log = self.new_log();

        let api = match self.connector.connect() {
            Ok(api) => api,
            Err(e) => {
                log.info(format!(
                    "Processing account: {}",
                    account.masked_identifier()
                ));
                log.error(format!("Could not create an HTTP session: {}", e));
                return SessionResult::new(
                    SessionStatus::LoginFailed,
                    Profile::default(),
                    log.lines(),
                );
            }
        };

        AccountSession::new(account.clone(), api, log)
            .with_scraper(self.scraper.clone())
            .with_settle_delay(self.settle_delay)
            .run()
            .await
    }

    async fn dispatch(&self, log: &mut LogAggregator, body: &str) -> NotificationOutcome {
        let Some(notifier) = &self.notifier else {
            log.warning("Notifications are disabled");
            return NotificationOutcome::Disabled;
        };

        match notifier.send(&self.title, body).await {
            Ok(()) => {
                log.success("Notification sent");
                NotificationOutcome::Sent
            }
            Err(e) => {
                log.error(format!("Failed to send notification: {}", e));
                NotificationOutcome::Failed
            }
        }
    }
}
