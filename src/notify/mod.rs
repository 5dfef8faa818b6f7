//! Outbound notifications
//!
//! The batch runner only needs "send this title and body somewhere a human
//! will read it". A missing notifier is represented as `None`, not as a
//! notifier that fails.

pub mod webhook;

pub use webhook::WebhookNotifier;

use crate::{Result, config::Settings};
use async_trait::async_trait;
use std::sync::Arc;

/// Delivery of a title + body message
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, title: &str, body: &str) -> Result<()>;
}

/// Build the configured notifier, `None` when notifications are disabled
pub fn from_settings(settings: &Settings) -> Result<Option<Arc<dyn Notifier>>> {
    match settings.notify.webhook_url.as_deref() {
        Some(url) => {
            let notifier = WebhookNotifier::new(url, settings.site.timeout())?;
            Ok(Some(Arc::new(notifier)))
        }
        None => Ok(None),
    }
}
