use serial_test::serial;
use std::env;

use keepalive_monitor::config::environment::{
    Config, DEFAULT_ALERT_RECIPIENT, DEFAULT_TARGET_URL,
};

const KEYS: &[&str] = &[
    "PORT",
    "ENABLE_SELF_PING",
    "KEEP_ALIVE_URL",
    "KEEP_ALIVE_INTERVAL",
    "KEEP_ALIVE_JITTER_SEC",
    "TARGET_URL",
    "MONITOR_INTERVAL",
    "ENABLE_MONITOR",
    "STATUS_TOKEN",
    "STATUS_RATE_LIMIT_BURST",
    "ALERT_RECIPIENT",
    "ALERT_WEBHOOK_URL",
];

fn clear_env() {
    for key in KEYS {
        env::remove_var(key);
    }
}

fn load() -> Config {
    Config::from_lookup(|key| env::var(key).ok())
}

#[serial]
#[test]
fn test_defaults_without_environment() {
    clear_env();
    let config = load();

    assert_eq!(config.server.port, 5000);
    assert_eq!(config.server.status_token, None);
    assert!(!config.self_ping.enabled);
    assert_eq!(config.self_ping.target_url, "http://127.0.0.1:5000/");
    assert_eq!(config.self_ping.base_interval_secs, 780);
    assert_eq!(config.self_ping.jitter_secs, 30);
    assert_eq!(config.self_ping.min_interval_floor_secs, 30);
    assert!(config.external_monitor.enabled);
    assert_eq!(config.external_monitor.target_url, DEFAULT_TARGET_URL);
    assert_eq!(config.external_monitor.interval_secs(), 300);
    assert_eq!(config.alert.recipient, DEFAULT_ALERT_RECIPIENT);
    assert_eq!(config.alert.webhook_url, None);
}

#[serial]
#[test]
fn test_overrides_are_applied() {
    clear_env();
    env::set_var("PORT", "8080");
    env::set_var("ENABLE_SELF_PING", "1");
    env::set_var("KEEP_ALIVE_URL", "https://my-app.onrender.com/");
    env::set_var("KEEP_ALIVE_INTERVAL", "600");
    env::set_var("KEEP_ALIVE_JITTER_SEC", "0");
    env::set_var("MONITOR_INTERVAL", "2");
    env::set_var("STATUS_TOKEN", "s3cret");
    env::set_var("ALERT_WEBHOOK_URL", "https://hooks.example.com/alerts");

    let config = load();
    clear_env();

    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.status_token.as_deref(), Some("s3cret"));
    assert!(config.self_ping.enabled);
    assert_eq!(config.self_ping.target_url, "https://my-app.onrender.com/");
    assert_eq!(config.self_ping.base_interval_secs, 600);
    assert_eq!(config.self_ping.jitter_secs, 0);
    assert_eq!(config.external_monitor.interval_minutes, 2);
    assert_eq!(
        config.alert.webhook_url.as_deref(),
        Some("https://hooks.example.com/alerts")
    );
}

#[serial]
#[test]
fn test_only_exact_one_enables_self_ping() {
    for value in ["true", "yes", "0", "", "01"] {
        clear_env();
        env::set_var("ENABLE_SELF_PING", value);
        assert!(!load().self_ping.enabled, "{:?} enabled self-ping", value);
    }
    clear_env();
}

#[serial]
#[test]
fn test_invalid_keep_alive_url_falls_back_to_local() {
    clear_env();
    env::set_var("PORT", "7000");
    env::set_var("KEEP_ALIVE_URL", "not a url");

    let config = load();
    clear_env();

    assert_eq!(config.self_ping.target_url, "http://127.0.0.1:7000/");
}

#[serial]
#[test]
fn test_invalid_numbers_use_defaults() {
    clear_env();
    env::set_var("KEEP_ALIVE_INTERVAL", "soon");
    env::set_var("MONITOR_INTERVAL", "-5");
    env::set_var("PORT", "99999");

    let config = load();
    clear_env();

    assert_eq!(config.self_ping.base_interval_secs, 780);
    assert_eq!(config.external_monitor.interval_minutes, 5);
    assert_eq!(config.server.port, 5000);
}

#[serial]
#[test]
fn test_empty_status_token_is_unset() {
    clear_env();
    env::set_var("STATUS_TOKEN", "");

    let config = load();
    clear_env();

    assert_eq!(config.server.status_token, None);
}
