use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::error::Error as StdError;
use std::time::Duration;

use super::types::ProbeResult;

/// Default per-probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "SelfKeepAlive/1.0";

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("request to {url} timed out after {}s", .timeout.as_secs_f64())]
    Timeout { url: String, timeout: Duration },
    #[error("connection to {url} failed: {detail}")]
    Connect { url: String, detail: String },
    #[error("invalid probe target {url}: {detail}")]
    InvalidTarget { url: String, detail: String },
    #[error("request to {url} failed: {detail}")]
    Request { url: String, detail: String },
}

impl ProbeError {
    fn from_reqwest(url: &str, timeout: Duration, err: reqwest::Error) -> Self {
        let url = url.to_string();
        let detail = error_chain(&err);
        if err.is_timeout() {
            Self::Timeout { url, timeout }
        } else if err.is_connect() {
            Self::Connect { url, detail }
        } else if err.is_builder() {
            Self::InvalidTarget { url, detail }
        } else {
            Self::Request { url, detail }
        }
    }
}

/// A single outbound health check.
///
/// Implementations never retry and never fail: network errors come back as
/// `ProbeResult::Failure`.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeResult;
}

/// Probes with a `HEAD` request so the target does not render a body.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new() -> Self {
        // Redirects are recorded as-is rather than followed.
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(redirect::Policy::none())
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Send the request and return the received status code.
    pub async fn try_probe(&self, url: &str, timeout: Duration) -> Result<u16, ProbeError> {
        let response = self
            .client
            .head(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ProbeError::from_reqwest(url, timeout, e))?;

        Ok(response.status().as_u16())
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeResult {
        match self.try_probe(url, timeout).await {
            Ok(code) => ProbeResult::Status(code),
            Err(e) => {
                tracing::debug!(%url, error = %e, "probe failed");
                ProbeResult::Failure(e.to_string())
            }
        }
    }
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
