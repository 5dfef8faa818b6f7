//! One account's check-in run
//!
//! [`AccountSession`] walks the [`SessionState`] machine: fetch the CSRF
//! token, log in, read the profile, check in, and on success wait for the
//! site to settle and read the profile again. Every failure is turned into a
//! log line and a terminal status; nothing escapes [`AccountSession::run`].

use crate::{
    Error, Result,
    logging::LogAggregator,
    session::{
        scraper::{PageScraper, RegexScraper, Selector},
        site::{LoginForm, SiteApi},
        state::{SessionState, SignOutcome, is_already_signed},
    },
    types::{Account, ApiResponse, Profile, SessionResult, SessionStatus, SignData},
    utils::privacy::{redact, redact_opt},
};
use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};

/// Name of the anti-forgery input on the login form
pub const CSRF_FIELD: &str = "_csrf";

/// Text only present on pages rendered for a logged-in user ("log out")
pub const LOGGED_IN_MARKER: &str = "退出";

/// Default pause between a successful check-in and the profile refresh
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

static USERNAME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::classes(["mobile-hide", "able-head-user-vip-username"]));
static POINTS_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::id("user-point-now"));
static SIGN_DAYS_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::id("sign-count"));

const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy)]
enum SummaryPhase {
    BeforeSign,
    AfterSign,
}

impl SummaryPhase {
    fn label(self) -> &'static str {
        match self {
            Self::BeforeSign => "before check-in",
            Self::AfterSign => "after check-in",
        }
    }
}

/// Drives one account from login to a terminal status
pub struct AccountSession {
    account: Account,
    api: Box<dyn SiteApi>,
    scraper: Arc<dyn PageScraper>,
    settle_delay: Duration,
    profile: Profile,
    log: LogAggregator,
    started: Instant,
}

impl AccountSession {
    /// Create a session writing into `log`
    pub fn new(account: Account, api: Box<dyn SiteApi>, log: LogAggregator) -> Self {
        Self {
            account,
            api,
            scraper: Arc::new(RegexScraper),
            settle_delay: DEFAULT_SETTLE_DELAY,
            profile: Profile::default(),
            log,
            started: Instant::now(),
        }
    }

    /// Use a different page scraper
    pub fn with_scraper(mut self, scraper: Arc<dyn PageScraper>) -> Self {
        self.scraper = scraper;
        self
    }

    /// Override the settling delay
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Run to a terminal state
    pub async fn run(mut self) -> SessionResult {
        self.log.info(format!(
            "Processing account: {}",
            self.account.masked_identifier()
        ));

        let mut state = SessionState::Init;
        loop {
            if let Some(status) = state.terminal_status() {
                return self.finish(status);
            }

            let next = self.advance(&state).await;
            debug_assert!(
                state.can_transition_to(&next),
                "illegal transition {} -> {}",
                state.name(),
                next.name()
            );
            tracing::debug!("session transition {} -> {}", state.name(), next.name());
            state = next;
        }
    }

    async fn advance(&mut self, state: &SessionState) -> SessionState {
        match state {
            SessionState::Init if !self.account.has_credentials() => {
                self.log.error("Email or password is empty");
                SessionState::Finished(SessionStatus::LoginFailed)
            }
            SessionState::Init => match self.fetch_token().await {
                Ok(token) => SessionState::TokenFetched { token },
                Err(e) => {
                    self.log.error(format!("Could not obtain CSRF token: {}", e));
                    SessionState::Finished(SessionStatus::LoginFailed)
                }
            },
            SessionState::TokenFetched { token } => match self.login(token).await {
                Ok(message) => {
                    self.log.success(message);
                    SessionState::LoggedIn
                }
                Err(e) => {
                    self.log.error(format!("Login failed: {}", e));
                    SessionState::Finished(SessionStatus::LoginFailed)
                }
            },
            SessionState::LoggedIn => {
                self.refresh_profile().await;
                self.summary(SummaryPhase::BeforeSign);
                SessionState::ProfileKnown
            }
            SessionState::ProfileKnown => SessionState::SignAttempted(self.check_in().await),
            SessionState::SignAttempted(outcome) => {
                SessionState::Finished(self.conclude(outcome).await)
            }
            SessionState::Finished(status) => SessionState::Finished(*status),
        }
    }

    async fn fetch_token(&self) -> Result<String> {
        let html = self.api.login_page().await?;
        self.scraper
            .input_value(&html, CSRF_FIELD)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::scrape(format!("input[name={}]", CSRF_FIELD)))
    }

    /// Returns the success message to log
    async fn login(&self, token: &str) -> Result<String> {
        let form = LoginForm::new(token, &self.account.identifier, &self.account.secret);
        let body = self.api.submit_login(&form).await?;

        match ApiResponse::parse(&body) {
            Some(response) if response.is_success() => {
                Ok(format!("Login succeeded: {}", response.message()))
            }
            Some(response) => Err(Error::auth(response.message())),
            None if body.contains(LOGGED_IN_MARKER) => Ok("Login succeeded".to_string()),
            None => Err(Error::protocol("unrecognised login response")),
        }
    }

    /// Best effort: every miss is a warning, never a state change
    async fn refresh_profile(&mut self) {
        let html = match self.api.home_page().await {
            Ok(html) => html,
            Err(e) => {
                self.log.error(format!("Failed to load the home page: {}", e));
                return;
            }
        };

        match self.extract(&html, &USERNAME_SELECTOR) {
            Ok(username) => {
                self.log.info(format!("Username: {}", redact(&username)));
                self.profile.username = Some(username);
            }
            Err(e) => self.log.warning(format!("Could not read the username ({})", e)),
        }

        match self.extract(&html, &POINTS_SELECTOR) {
            Ok(points) => {
                self.log.info(format!("Current points: {}", points));
                self.profile.points = Some(points);
            }
            Err(e) => self
                .log
                .warning(format!("Could not read the point balance ({})", e)),
        }

        match self.extract(&html, &SIGN_DAYS_SELECTOR) {
            Ok(days) => {
                self.log.info(format!("Consecutive check-in days: {}", days));
                self.profile.sign_days = Some(days);
            }
            Err(e) => self
                .log
                .warning(format!("Could not read the check-in streak ({})", e)),
        }
    }

    fn extract(&self, html: &str, selector: &Selector) -> Result<String> {
        self.scraper
            .text(html, selector)
            .ok_or_else(|| Error::scrape(selector.to_string()))
    }

    async fn check_in(&self) -> SignOutcome {
        let body = match self.api.check_in().await {
            Ok(body) => body,
            Err(e) => {
                return SignOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        match ApiResponse::parse(&body) {
            Some(response) if response.is_success() => SignOutcome::Signed {
                message: response.message().to_string(),
                data: response.sign_data(),
            },
            Some(response) if is_already_signed(response.message()) => {
                SignOutcome::AlreadySigned {
                    message: response.message().to_string(),
                }
            }
            Some(response) => SignOutcome::Failed {
                reason: response.message().to_string(),
            },
            None => SignOutcome::Failed {
                reason: "response is not valid JSON".to_string(),
            },
        }
    }

    async fn conclude(&mut self, outcome: &SignOutcome) -> SessionStatus {
        match outcome {
            SignOutcome::Signed { message, data } => {
                self.log.success(format!("Check-in succeeded: {}", message));
                if let Some(data) = data {
                    self.apply_sign_data(data);
                }

                self.log.info("Check-in succeeded, refreshing profile...");
                if !self.settle_delay.is_zero() {
                    tokio::time::sleep(self.settle_delay).await;
                }
                self.refresh_profile().await;
                self.summary(SummaryPhase::AfterSign);
            }
            SignOutcome::AlreadySigned { message } => {
                self.log.info(format!("Already checked in today: {}", message));
            }
            SignOutcome::Failed { reason } => {
                self.log.error(format!("Check-in failed: {}", reason));
            }
        }
        outcome.status()
    }

    fn apply_sign_data(&mut self, data: &SignData) {
        if let Some(points) = &data.points {
            self.log.info(format!("Updated points: {}", points));
            self.profile.points = Some(points.clone());
        }
        if let Some(days) = &data.sign_days {
            self.log.info(format!("Updated consecutive days: {}", days));
            self.profile.sign_days = Some(days.clone());
        }
    }

    fn summary(&mut self, phase: SummaryPhase) {
        let rule = "=".repeat(RULE_WIDTH);
        let elapsed = self.started.elapsed().as_secs_f64();

        self.log.info(rule.as_str());
        self.log.info(format!(
            "User {} {}:",
            redact_opt(self.profile.username.as_deref()),
            phase.label()
        ));
        if let Some(username) = &self.profile.username {
            self.log.info(format!("  • Username: {}", redact(username)));
        }
        if let Some(points) = self.profile.points.as_deref().filter(|p| !p.is_empty()) {
            self.log.info(format!("  • Points: {}", points));
        }
        if let Some(days) = self.profile.sign_days.as_deref().filter(|d| !d.is_empty()) {
            self.log.info(format!("  • Streak: {} days", days));
        }
        self.log.info(format!("  • Elapsed: {:.2}s", elapsed));
        self.log.info(rule);
        self.log.info("");
    }

    fn finish(self, status: SessionStatus) -> SessionResult {
        tracing::info!(
            "Account {} finished: {}",
            self.account.masked_identifier(),
            status
        );
        SessionResult::new(status, self.profile, self.log.lines())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::{FixedClock, LogClock};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const LOGIN_PAGE: &str = r#"<form><input type="hidden" name="_csrf" value="tok123"></form>"#;
    const HOME_PAGE: &str = r#"<a class="mobile-hide able-head-user-vip-username">researcher</a>
        <span id="user-point-now">100</span><span id="sign-count">3</span>"#;

    /// Canned responses per endpoint plus a call log
    #[derive(Default)]
    struct FakeSite {
        login_page: Mutex<VecDeque<Result<String>>>,
        login: Mutex<VecDeque<Result<String>>>,
        home: Mutex<VecDeque<Result<String>>>,
        sign: Mutex<VecDeque<Result<String>>>,
        calls: Arc<Mutex<Vec<&'static str>>>,
        forms: Arc<Mutex<Vec<LoginForm>>>,
    }

    impl FakeSite {
        fn happy(sign_body: &str) -> Self {
            let site = Self::default();
            site.login_page.lock().unwrap().push_back(Ok(LOGIN_PAGE.into()));
            site.login
                .lock()
                .unwrap()
                .push_back(Ok(r#"{"code":0,"msg":"ok"}"#.into()));
            site.home.lock().unwrap().push_back(Ok(HOME_PAGE.into()));
            site.home.lock().unwrap().push_back(Ok(HOME_PAGE
                .replace(">100<", ">110<")
                .replace(">3<", ">4<")));
            site.sign.lock().unwrap().push_back(Ok(sign_body.into()));
            site
        }

        fn next(queue: &Mutex<VecDeque<Result<String>>>) -> Result<String> {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::internal("no canned response")))
        }
    }

    #[async_trait]
    impl SiteApi for FakeSite {
        async fn login_page(&self) -> Result<String> {
            self.calls.lock().unwrap().push("login_page");
            Self::next(&self.login_page)
        }

        async fn submit_login(&self, form: &LoginForm) -> Result<String> {
            self.calls.lock().unwrap().push("submit_login");
            self.forms.lock().unwrap().push(form.clone());
            Self::next(&self.login)
        }

        async fn home_page(&self) -> Result<String> {
            self.calls.lock().unwrap().push("home_page");
            Self::next(&self.home)
        }

        async fn check_in(&self) -> Result<String> {
            self.calls.lock().unwrap().push("check_in");
            Self::next(&self.sign)
        }
    }

    fn log() -> LogAggregator {
        let instant = Utc.with_ymd_and_hms(2025, 9, 2, 23, 40, 0).unwrap();
        LogAggregator::new(LogClock::new(Arc::new(FixedClock(instant)), 8))
    }

    async fn run(site: FakeSite) -> (SessionResult, Vec<&'static str>) {
        let calls = site.calls.clone();
        let result = AccountSession::new(
            Account::new("alice@example.com", "secret"),
            Box::new(site),
            log(),
        )
        .with_settle_delay(Duration::ZERO)
        .run()
        .await;
        let calls = calls.lock().unwrap().clone();
        (result, calls)
    }

    #[tokio::test]
    async fn test_signed_success_refreshes_profile() {
        let site = FakeSite::happy(r#"{"code":0,"msg":"签到成功"}"#);
        let forms = site.forms.clone();
        let (result, calls) = run(site).await;

        assert_eq!(result.status, SessionStatus::SignedSuccess);
        assert_eq!(
            calls,
            vec!["login_page", "submit_login", "home_page", "check_in", "home_page"]
        );
        assert_eq!(result.points.as_deref(), Some("110"));
        assert_eq!(result.sign_days.as_deref(), Some("4"));
        assert_eq!(result.username.as_deref(), Some("researcher"));

        let forms = forms.lock().unwrap();
        assert_eq!(forms[0].csrf, "tok123");
        assert_eq!(forms[0].email, "alice@example.com");

        let log = result.log();
        assert!(log.contains("before check-in"));
        assert!(log.contains("after check-in"));
        assert!(log.contains("  • Streak: 4 days"));
    }

    #[tokio::test]
    async fn test_sign_data_overwrites_profile() {
        let site = FakeSite::happy(r#"{"code":0,"msg":"ok","data":{"points":150,"sign_days":9}}"#);
        site.home.lock().unwrap().truncate(1);
        site.home
            .lock()
            .unwrap()
            .push_back(Ok("<html>nothing here</html>".into()));
        let (result, _) = run(site).await;

        assert_eq!(result.status, SessionStatus::SignedSuccess);
        assert_eq!(result.points.as_deref(), Some("150"));
        assert_eq!(result.sign_days.as_deref(), Some("9"));
        assert!(result.log().contains("Updated points: 150"));
    }

    #[tokio::test]
    async fn test_already_signed_skips_refresh() {
        let site = FakeSite::happy(r#"{"code":1,"msg":"今日已签到"}"#);
        let (result, calls) = run(site).await;

        assert_eq!(result.status, SessionStatus::AlreadySigned);
        assert_eq!(
            calls,
            vec!["login_page", "submit_login", "home_page", "check_in"]
        );
        assert!(!result.log().contains("after check-in"));
        assert!(result.log().contains("ℹ️ Already checked in today"));
    }

    #[tokio::test]
    async fn test_login_rejected_stops_everything() {
        let site = FakeSite::default();
        site.login_page.lock().unwrap().push_back(Ok(LOGIN_PAGE.into()));
        site.login
            .lock()
            .unwrap()
            .push_back(Ok(r#"{"code":1,"msg":"密码错误"}"#.into()));
        let (result, calls) = run(site).await;

        assert_eq!(result.status, SessionStatus::LoginFailed);
        assert_eq!(calls, vec!["login_page", "submit_login"]);
        assert!(result.log().contains("密码错误"));
        assert!(result.points.is_none());
    }

    #[tokio::test]
    async fn test_missing_csrf_token_fails_login() {
        let site = FakeSite::default();
        site.login_page
            .lock()
            .unwrap()
            .push_back(Ok("<html>maintenance</html>".into()));
        let (result, calls) = run(site).await;

        assert_eq!(result.status, SessionStatus::LoginFailed);
        assert_eq!(calls, vec!["login_page"]);
        assert!(result.log().contains("input[name=_csrf]"));
    }

    #[tokio::test]
    async fn test_html_login_with_marker() {
        let site = FakeSite::happy(r#"{"code":0,"msg":"ok"}"#);
        site.login.lock().unwrap().clear();
        site.login
            .lock()
            .unwrap()
            .push_back(Ok("<html><a href=\"/site/logout\">退出</a></html>".into()));
        let (result, _) = run(site).await;
        assert_eq!(result.status, SessionStatus::SignedSuccess);
    }

    #[tokio::test]
    async fn test_html_login_without_marker() {
        let site = FakeSite::happy(r#"{"code":0,"msg":"ok"}"#);
        site.login.lock().unwrap().clear();
        site.login
            .lock()
            .unwrap()
            .push_back(Ok("<html>please log in</html>".into()));
        let (result, calls) = run(site).await;

        assert_eq!(result.status, SessionStatus::LoginFailed);
        assert_eq!(calls, vec!["login_page", "submit_login"]);
    }

    #[tokio::test]
    async fn test_sign_failures() {
        for body in [
            Ok(r#"{"code":2,"msg":"系统繁忙"}"#.to_string()),
            Ok("<html>oops</html>".to_string()),
            Err(Error::protocol("check-in returned status 500")),
        ] {
            let site = FakeSite::happy("");
            site.sign.lock().unwrap().clear();
            site.sign.lock().unwrap().push_back(body);
            let (result, calls) = run(site).await;

            assert_eq!(result.status, SessionStatus::SignFailed);
            assert_eq!(calls.last(), Some(&"check_in"));
            assert!(result.log().contains("❌ Check-in failed"));
        }
    }

    #[tokio::test]
    async fn test_profile_misses_are_warnings() {
        let site = FakeSite::happy(r#"{"code":1,"msg":"已经签到"}"#);
        site.home.lock().unwrap().clear();
        site.home
            .lock()
            .unwrap()
            .push_back(Ok("<html>redesigned page</html>".into()));
        let (result, _) = run(site).await;

        assert_eq!(result.status, SessionStatus::AlreadySigned);
        let log = result.log();
        assert!(log.contains("⚠️ Could not read the username"));
        assert!(log.contains("⚠️ Could not read the point balance"));
        assert!(log.contains("⚠️ Could not read the check-in streak"));
        assert!(log.contains("User unknown before check-in:"));
    }

    #[tokio::test]
    async fn test_home_page_error_does_not_block_check_in() {
        let site = FakeSite::happy(r#"{"code":0,"msg":"ok"}"#);
        site.home.lock().unwrap().clear();
        let (result, calls) = run(site).await;

        assert_eq!(result.status, SessionStatus::SignedSuccess);
        assert_eq!(calls.iter().filter(|c| **c == "home_page").count(), 2);
        assert!(result.log().contains("Failed to load the home page"));
    }

    #[tokio::test]
    async fn test_identifiers_are_redacted_in_log() {
        let site = FakeSite::happy(r#"{"code":0,"msg":"ok"}"#);
        let (result, _) = run(site).await;
        let log = result.log();

        assert!(log.contains("al***@example.com"));
        assert!(!log.contains("alice@example.com"));
        assert!(log.contains("re***"));
        assert!(!log.contains("researcher"));
    }

    #[tokio::test]
    async fn test_empty_credentials_never_hit_the_network() {
        let site = FakeSite::happy(r#"{"code":0,"msg":"ok"}"#);
        let calls = site.calls.clone();
        let result = AccountSession::new(
            Account::new("alice@example.com", ""),
            Box::new(site),
            log(),
        )
        .run()
        .await;

        assert_eq!(result.status, SessionStatus::LoginFailed);
        assert!(calls.lock().unwrap().is_empty());
        assert!(result.log().contains("❌ Email or password is empty"));
        assert!(!result.log().contains("CSRF"));
    }

    #[tokio::test]
    async fn test_loosely_typed_sign_responses() {
        let site = FakeSite::happy(r#"{"code":"1","msg":"今日已签到"}"#);
        let (result, calls) = run(site).await;
        assert_eq!(result.status, SessionStatus::AlreadySigned);
        assert_eq!(calls.last(), Some(&"check_in"));

        let site = FakeSite::happy(r#"{"code":"0","msg":"ok"}"#);
        let (result, _) = run(site).await;
        assert_eq!(result.status, SessionStatus::SignFailed);

        let site = FakeSite::happy(r#"{"code":2,"msg":500}"#);
        let (result, _) = run(site).await;
        assert_eq!(result.status, SessionStatus::SignFailed);
        assert!(result.log().contains("❌ Check-in failed: 500"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_delay_only_after_success() {
        let settle = Duration::from_secs(60);

        let site = FakeSite::happy(r#"{"code":1,"msg":"今日已签到"}"#);
        let before = tokio::time::Instant::now();
        let result = AccountSession::new(
            Account::new("alice@example.com", "secret"),
            Box::new(site),
            log(),
        )
        .with_settle_delay(settle)
        .run()
        .await;
        assert_eq!(result.status, SessionStatus::AlreadySigned);
        assert_eq!(tokio::time::Instant::now(), before);

        let site = FakeSite::happy(r#"{"code":0,"msg":"签到成功"}"#);
        let before = tokio::time::Instant::now();
        let result = AccountSession::new(
            Account::new("alice@example.com", "secret"),
            Box::new(site),
            log(),
        )
        .with_settle_delay(settle)
        .run()
        .await;
        assert_eq!(result.status, SessionStatus::SignedSuccess);
        assert!(tokio::time::Instant::now() - before >= settle);
    }
}
