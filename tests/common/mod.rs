//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

/// Test helper functions
pub mod helpers {
    use ablesci_checkin::{
        Error, Result,
        notify::Notifier,
        session::{LoginForm, SiteApi, SiteConnector},
        utils::clock::{FixedClock, LogClock},
    };
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    pub const LOGIN_PAGE: &str =
        r#"<form method="post"><input type="hidden" name="_csrf" value="csrf-token-1"></form>"#;
    pub const HOME_PAGE: &str = r#"<header>
        <a class="mobile-hide able-head-user-vip-username" href="/user/index">researcher</a>
        <a href="/site/logout">退出</a></header>
        <span id="user-point-now">100</span> <span id="sign-count">5</span>"#;
    pub const SIGNED: &str =
        r#"{"code":0,"msg":"签到成功","data":{"points":110,"sign_days":6}}"#;
    pub const ALREADY_SIGNED: &str = r#"{"code":1,"msg":"今天已经签到过了"}"#;
    pub const LOGIN_OK: &str = r#"{"code":0,"msg":"登录成功"}"#;

    /// Every request made by every scripted site, as `label:endpoint`
    pub type CallLog = Arc<Mutex<Vec<String>>>;

    type Queue = Mutex<VecDeque<Result<String>>>;

    /// In-memory site answering from per-endpoint queues
    pub struct ScriptedSite {
        label: String,
        calls: CallLog,
        login_page: Queue,
        login: Queue,
        home: Queue,
        sign: Queue,
    }

    impl ScriptedSite {
        pub fn new(label: &str, calls: &CallLog) -> Self {
            Self {
                label: label.to_string(),
                calls: calls.clone(),
                login_page: Queue::default(),
                login: Queue::default(),
                home: Queue::default(),
                sign: Queue::default(),
            }
        }

        /// Logs in fine, two readable home pages, then `sign_body`
        pub fn happy(label: &str, calls: &CallLog, sign_body: &str) -> Self {
            Self::new(label, calls)
                .login_page(Ok(LOGIN_PAGE.to_string()))
                .login(Ok(LOGIN_OK.to_string()))
                .home(Ok(HOME_PAGE.to_string()))
                .home(Ok(HOME_PAGE.replace(">100<", ">110<")))
                .sign(Ok(sign_body.to_string()))
        }

        pub fn login_page(self, response: Result<String>) -> Self {
            self.login_page.lock().unwrap().push_back(response);
            self
        }

        pub fn login(self, response: Result<String>) -> Self {
            self.login.lock().unwrap().push_back(response);
            self
        }

        pub fn home(self, response: Result<String>) -> Self {
            self.home.lock().unwrap().push_back(response);
            self
        }

        pub fn sign(self, response: Result<String>) -> Self {
            self.sign.lock().unwrap().push_back(response);
            self
        }

        fn answer(&self, endpoint: &str, queue: &Queue) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.label, endpoint));
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::internal(format!("{} exhausted", endpoint))))
        }
    }

    #[async_trait]
    impl SiteApi for ScriptedSite {
        async fn login_page(&self) -> Result<String> {
            self.answer("login_page", &self.login_page)
        }

        async fn submit_login(&self, _form: &LoginForm) -> Result<String> {
            self.answer("submit_login", &self.login)
        }

        async fn home_page(&self) -> Result<String> {
            self.answer("home_page", &self.home)
        }

        async fn check_in(&self) -> Result<String> {
            self.answer("check_in", &self.sign)
        }
    }

    /// Hands out scripted sites in order, one per account
    #[derive(Default)]
    pub struct ScriptedConnector {
        sites: Mutex<VecDeque<Result<ScriptedSite>>>,
    }

    impl ScriptedConnector {
        pub fn new(sites: Vec<Result<ScriptedSite>>) -> Self {
            Self {
                sites: Mutex::new(sites.into()),
            }
        }
    }

    impl SiteConnector for ScriptedConnector {
        fn connect(&self) -> Result<Box<dyn SiteApi>> {
            match self.sites.lock().unwrap().pop_front() {
                Some(Ok(site)) => Ok(Box::new(site)),
                Some(Err(e)) => Err(e),
                None => Err(Error::internal("no scripted site left")),
            }
        }
    }

    /// Notifier that records what it was asked to send
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<(String, String)>>,
        pub fail: bool,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn messages(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, title: &str, body: &str) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
            if self.fail {
                Err(Error::notify("gateway down"))
            } else {
                Ok(())
            }
        }
    }

    /// Log clock pinned to 2025-09-03 07:40:00 (+8)
    pub fn fixed_clock() -> LogClock {
        let instant = Utc.with_ymd_and_hms(2025, 9, 2, 23, 40, 0).unwrap();
        LogClock::new(Arc::new(FixedClock(instant)), 8)
    }

    /// A genuine transport failure: connection refused on a closed port
    pub async fn transport_error() -> Error {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1/")
            .timeout(std::time::Duration::from_secs(2))
            .send()
            .await
            .expect_err("nothing listens on port 1");
        Error::from(err)
    }

    /// Calls recorded for one label, in order
    pub fn calls_for(calls: &CallLog, label: &str) -> Vec<String> {
        let prefix = format!("{}:", label);
        calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| c.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }
}
