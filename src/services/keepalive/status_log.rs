use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::types::{ProbeOutcome, ProbeResult};

/// Number of outcomes retained per log.
pub const STATUS_LOG_CAPACITY: usize = 3;

#[derive(Debug, Default)]
struct StatusState {
    target_url: Option<String>,
    interval_secs: Option<u64>,
    recent: VecDeque<ProbeOutcome>,
}

/// Bounded, newest-first history of probe outcomes for one loop.
///
/// Cloning shares the underlying state. Writers hold the lock only to push a
/// fully built outcome, so a snapshot never sees a partial write.
#[derive(Debug, Clone, Default)]
pub struct StatusLog {
    inner: Arc<RwLock<StatusState>>,
}

/// Read-only copy of a `StatusLog`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub last_ping: Option<DateTime<Utc>>,
    pub last_status: Option<ProbeResult>,
    pub target_url: Option<String>,
    pub interval_secs: Option<u64>,
    /// Newest first, at most `STATUS_LOG_CAPACITY` entries.
    pub recent: Vec<ProbeOutcome>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the effective target and interval of the owning loop.
    pub async fn configure(&self, target_url: &str, interval_secs: u64) {
        let mut state = self.inner.write().await;
        state.target_url = Some(target_url.to_string());
        state.interval_secs = Some(interval_secs);
    }

    pub async fn record(&self, outcome: ProbeOutcome) {
        let mut state = self.inner.write().await;
        state.recent.push_front(outcome);
        state.recent.truncate(STATUS_LOG_CAPACITY);
    }

    pub async fn snapshot(&self) -> StatusSnapshot {
        let state = self.inner.read().await;
        let latest = state.recent.front();
        StatusSnapshot {
            last_ping: latest.map(|o| o.timestamp),
            last_status: latest.map(|o| o.result.clone()),
            target_url: state.target_url.clone(),
            interval_secs: state.interval_secs,
            recent: state.recent.iter().cloned().collect(),
        }
    }
}
