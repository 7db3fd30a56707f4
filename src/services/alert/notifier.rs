use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AlertConfig;
use crate::services::keepalive::AlertEvent;

use super::types::{AlertError, AlertMessage};

/// Transport invoked when the external monitor detects an outage.
///
/// Fire-and-forget: callers log an `Err` and move on, nothing is retried.
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, event: &AlertEvent) -> Result<(), AlertError>;
}

/// Writes alerts to the log only.
#[derive(Debug, Clone)]
pub struct LogAlertNotifier {
    recipient: String,
}

impl LogAlertNotifier {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }
}

#[async_trait]
impl AlertNotifier for LogAlertNotifier {
    async fn notify(&self, event: &AlertEvent) -> Result<(), AlertError> {
        let message = AlertMessage::compose(event, &self.recipient);
        tracing::warn!(
            recipient = %message.recipient,
            subject = %message.subject,
            target_url = %message.target_url,
            "{}",
            message.body
        );
        Ok(())
    }
}

/// Posts alerts as JSON to an HTTP relay (mail gateway, chat webhook).
#[derive(Debug, Clone)]
pub struct WebhookAlertNotifier {
    client: Client,
    url: String,
    recipient: String,
}

impl WebhookAlertNotifier {
    pub fn new(url: impl Into<String>, recipient: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("KeepAliveMonitor-Alerts/1.0")
            .build()
            .unwrap_or_default();

        Self {
            client,
            url: url.into(),
            recipient: recipient.into(),
        }
    }
}

#[async_trait]
impl AlertNotifier for WebhookAlertNotifier {
    async fn notify(&self, event: &AlertEvent) -> Result<(), AlertError> {
        let message = AlertMessage::compose(event, &self.recipient);
        let response = self.client.post(&self.url).json(&message).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AlertError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::info!(relay = %self.url, target_url = %event.target, "Alert delivered");
        Ok(())
    }
}

/// Pick the transport described by the configuration.
pub fn notifier_from_config(config: &AlertConfig) -> Arc<dyn AlertNotifier> {
    match &config.webhook_url {
        Some(url) => Arc::new(WebhookAlertNotifier::new(url.clone(), config.recipient.clone())),
        None => {
            tracing::info!("ALERT_WEBHOOK_URL not set; alerts will only be logged");
            Arc::new(LogAlertNotifier::new(config.recipient.clone()))
        }
    }
}
