//! JSON webhook notifier
//!
//! POSTs `{"title": ..., "content": ...}`, the shape most push gateways
//! accept.

use crate::{Error, Result, notify::Notifier};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use url::Url;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    title: &'a str,
    content: &'a str,
}

/// Sends notifications to a single webhook URL
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: Url,
}

impl WebhookNotifier {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, title: &str, body: &str) -> Result<()> {
        tracing::debug!("POST notification to {}", self.url.host_str().unwrap_or("?"));

        let response = self
            .client
            .post(self.url.clone())
            .json(&WebhookPayload {
                title,
                content: body,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::notify(format!(
                "webhook returned status {}",
                status.as_u16()
            )));
        }

        Ok(())
    }
}
