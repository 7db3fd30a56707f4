use serde::{Deserialize, Serialize};

use crate::services::keepalive::{format_timestamp, ProbeOutcome, ProbeResult, StatusSnapshot};

#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: String,
    pub status: ProbeResult,
}

impl From<&ProbeOutcome> for LogEntry {
    fn from(outcome: &ProbeOutcome) -> Self {
        Self {
            time: format_timestamp(&outcome.timestamp),
            status: outcome.result.clone(),
        }
    }
}

/// External monitor section of the status payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorStatus {
    pub last_check: Option<String>,
    pub last_status: Option<ProbeResult>,
    pub target_url: Option<String>,
    pub interval_secs: Option<u64>,
    pub recent_logs: Vec<LogEntry>,
}

impl From<StatusSnapshot> for MonitorStatus {
    fn from(snapshot: StatusSnapshot) -> Self {
        Self {
            last_check: snapshot.last_ping.as_ref().map(format_timestamp),
            last_status: snapshot.last_status,
            target_url: snapshot.target_url,
            interval_secs: snapshot.interval_secs,
            recent_logs: snapshot.recent.iter().map(LogEntry::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub last_ping: Option<String>,
    pub keep_alive_status: Option<ProbeResult>,
    pub keep_alive_url: Option<String>,
    pub monitor_interval: Option<u64>,
    pub recent_logs: Vec<LogEntry>,
    pub external_monitor: MonitorStatus,
}

impl StatusResponse {
    pub fn new(self_ping: StatusSnapshot, external: StatusSnapshot) -> Self {
        Self {
            last_ping: self_ping.last_ping.as_ref().map(format_timestamp),
            keep_alive_status: self_ping.last_status,
            keep_alive_url: self_ping.target_url,
            monitor_interval: self_ping.interval_secs,
            recent_logs: self_ping.recent.iter().map(LogEntry::from).collect(),
            external_monitor: external.into(),
        }
    }
}
