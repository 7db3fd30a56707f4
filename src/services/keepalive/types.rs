use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified result of a single probe.
///
/// Every received status code is kept verbatim; only network-level errors
/// become `Failure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProbeResult {
    Status(u16),
    Failure(String),
}

impl ProbeResult {
    /// A response was received, whatever its status code.
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Status(_))
    }

    /// 200..=399, used only to pick a log level.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Status(code) if (200..400).contains(code))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Status(_) if self.is_healthy() => "healthy",
            Self::Status(_) => "degraded",
            Self::Failure(_) => "failure",
        }
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "{}", code),
            Self::Failure(detail) => f.write_str(detail),
        }
    }
}

/// One observation of a probe target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub timestamp: DateTime<Utc>,
    pub target: String,
    pub result: ProbeResult,
}

impl ProbeOutcome {
    /// Stamp the outcome with the current UTC time.
    pub fn new(target: impl Into<String>, result: ProbeResult) -> Self {
        Self::at(Utc::now(), target, result)
    }

    pub fn at(timestamp: DateTime<Utc>, target: impl Into<String>, result: ProbeResult) -> Self {
        Self {
            timestamp,
            target: target.into(),
            result,
        }
    }
}

/// Passed to the alert notifier when a probe fails. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEvent {
    pub target: String,
    pub timestamp: DateTime<Utc>,
    pub detail: String,
}

impl AlertEvent {
    /// Build an event from a failed outcome; `None` when the target answered.
    pub fn from_outcome(outcome: &ProbeOutcome) -> Option<Self> {
        match &outcome.result {
            ProbeResult::Failure(detail) => Some(Self {
                target: outcome.target.clone(),
                timestamp: outcome.timestamp,
                detail: detail.clone(),
            }),
            ProbeResult::Status(_) => None,
        }
    }
}

/// ISO-8601 rendering used on the wire.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}
