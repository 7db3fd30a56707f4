use serde::{Deserialize, Serialize};

use crate::services::keepalive::{format_timestamp, AlertEvent};

pub const ALERT_SUBJECT: &str = "Server Down Alert";

/// Alert as handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub target_url: String,
    pub detected_at: String,
}

impl AlertMessage {
    pub fn compose(event: &AlertEvent, recipient: &str) -> Self {
        Self {
            recipient: recipient.to_string(),
            subject: ALERT_SUBJECT.to_string(),
            body: format!(
                "Alert: The server at {} is not reachable.\n\nDetails:\n{}",
                event.target, event.detail
            ),
            target_url: event.target.clone(),
            detected_at: format_timestamp(&event.timestamp),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("Alert transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Alert relay rejected message with status {status}")]
    Rejected { status: u16 },
}
