use std::env;
use std::str::FromStr;

use reqwest::Url;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_KEEP_ALIVE_INTERVAL_SECS: u64 = 780;
pub const DEFAULT_KEEP_ALIVE_JITTER_SECS: u64 = 30;
pub const MIN_INTERVAL_FLOOR_SECS: u64 = 30;
pub const DEFAULT_MONITOR_INTERVAL_MINUTES: u64 = 5;
pub const DEFAULT_TARGET_URL: &str = "https://acro-match-w8t0.onrender.com";
pub const DEFAULT_ALERT_RECIPIENT: &str = "recipient_email@example.com";
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 30;
/// Ceiling for KEEP_ALIVE_INTERVAL and KEEP_ALIVE_JITTER_SEC (one day).
pub const MAX_SELF_PING_SECS: u64 = 86_400;
/// Ceiling for MONITOR_INTERVAL (one week).
pub const MAX_MONITOR_INTERVAL_MINUTES: u64 = 10_080;

/// Environment configuration
/// Read once at startup; running loops never observe later changes.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub self_ping: MonitorConfig,
    pub external_monitor: ExternalMonitorConfig,
    pub alert: AlertConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    /// Shared secret required on `/status` when set.
    pub status_token: Option<String>,
    pub rate_limit_burst: u32,
}

/// Self-ping loop settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub enabled: bool,
    pub target_url: String,
    pub base_interval_secs: u64,
    pub jitter_secs: u64,
    pub min_interval_floor_secs: u64,
}

/// External target watched on behalf of an operator.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalMonitorConfig {
    pub enabled: bool,
    pub target_url: String,
    pub interval_minutes: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertConfig {
    pub recipient: String,
    /// HTTP relay receiving alert messages. Alerts are only logged without it.
    pub webhook_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerConfig::from_lookup(&lookup);
        Self {
            self_ping: MonitorConfig::from_lookup(&lookup, server.port),
            external_monitor: ExternalMonitorConfig::from_lookup(&lookup),
            alert: AlertConfig::from_lookup(&lookup),
            server,
        }
    }
}

impl ServerConfig {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            port: parse_or(lookup, "PORT", DEFAULT_PORT),
            status_token: lookup("STATUS_TOKEN").filter(|token| !token.is_empty()),
            rate_limit_burst: parse_or(lookup, "STATUS_RATE_LIMIT_BURST", DEFAULT_RATE_LIMIT_BURST),
        }
    }
}

impl MonitorConfig {
    pub fn from_lookup<F>(lookup: &F, port: u16) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            enabled: lookup("ENABLE_SELF_PING").as_deref() == Some("1"),
            target_url: resolve_target_url(lookup("KEEP_ALIVE_URL").as_deref(), port),
            base_interval_secs: parse_bounded_or(
                lookup,
                "KEEP_ALIVE_INTERVAL",
                DEFAULT_KEEP_ALIVE_INTERVAL_SECS,
                MAX_SELF_PING_SECS,
            ),
            jitter_secs: parse_bounded_or(
                lookup,
                "KEEP_ALIVE_JITTER_SEC",
                DEFAULT_KEEP_ALIVE_JITTER_SECS,
                MAX_SELF_PING_SECS,
            ),
            min_interval_floor_secs: MIN_INTERVAL_FLOOR_SECS,
        }
    }
}

impl ExternalMonitorConfig {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let target_url = non_empty(lookup("TARGET_URL")).unwrap_or_else(|| DEFAULT_TARGET_URL.to_string());
        if Url::parse(&target_url).is_err() {
            tracing::warn!(%target_url, "TARGET_URL is not a valid URL; every probe will fail");
        }

        let interval_minutes = parse_bounded_or(
            lookup,
            "MONITOR_INTERVAL",
            DEFAULT_MONITOR_INTERVAL_MINUTES,
            MAX_MONITOR_INTERVAL_MINUTES,
        );
        if interval_minutes == 0 {
            tracing::warn!("MONITOR_INTERVAL must be at least 1 minute; using 1");
        }

        Self {
            enabled: lookup("ENABLE_MONITOR").as_deref() != Some("0"),
            target_url,
            interval_minutes: interval_minutes.max(1),
        }
    }

    /// Period in seconds, with the minute count held to `1..=MAX_MONITOR_INTERVAL_MINUTES`.
    pub fn interval_secs(&self) -> u64 {
        self.interval_minutes.clamp(1, MAX_MONITOR_INTERVAL_MINUTES) * 60
    }
}

impl AlertConfig {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            recipient: non_empty(lookup("ALERT_RECIPIENT"))
                .unwrap_or_else(|| DEFAULT_ALERT_RECIPIENT.to_string()),
            webhook_url: non_empty(lookup("ALERT_WEBHOOK_URL")),
        }
    }
}

/// Local health URL used when no usable self-ping target is configured.
pub fn default_local_url(port: u16) -> String {
    format!("http://127.0.0.1:{}/", port)
}

/// Resolve the self-ping target: the override when it parses with a host,
/// the local health URL otherwise.
pub fn resolve_target_url(raw: Option<&str>, port: u16) -> String {
    let Some(candidate) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return default_local_url(port);
    };

    match Url::parse(candidate) {
        Ok(url) if url.host_str().is_some_and(|host| !host.is_empty()) => candidate.to_string(),
        Ok(_) => {
            tracing::warn!(url = %candidate, "KEEP_ALIVE_URL has no host; falling back to local health URL");
            default_local_url(port)
        }
        Err(e) => {
            tracing::warn!(url = %candidate, error = %e, "KEEP_ALIVE_URL is not a valid URL; falling back to local health URL");
            default_local_url(port)
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match non_empty(lookup(key)) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(%key, value = %raw, %default, "invalid numeric setting; using default");
            default
        }),
    }
}

fn parse_bounded_or<F>(lookup: &F, key: &str, default: u64, max: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default);
    if value > max {
        tracing::warn!(%key, value, max, %default, "setting above ceiling; using default");
        return default;
    }
    value
}
