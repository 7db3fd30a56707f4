use std::time::Duration;
use tokio::sync::watch;

use keepalive_monitor::config::MonitorConfig;
use keepalive_monitor::services::keepalive::{
    ProbeResult, SelfPingLoop, SelfPingState, StatusLog,
};

use crate::common::ScriptedProber;

fn config(enabled: bool, base_interval_secs: u64, jitter_secs: u64) -> MonitorConfig {
    MonitorConfig {
        enabled,
        target_url: "http://127.0.0.1:5000/".to_string(),
        base_interval_secs,
        jitter_secs,
        min_interval_floor_secs: 30,
    }
}

#[tokio::test(start_paused = true)]
async fn test_disabled_loop_never_probes() {
    let prober = ScriptedProber::always(ProbeResult::Status(200));
    let status = StatusLog::new();
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = SelfPingLoop::new(config(false, 780, 30), prober.clone(), status.clone())
        .spawn(shutdown_rx);

    // Thirty days of simulated time.
    tokio::time::sleep(Duration::from_secs(30 * 24 * 3600)).await;

    assert_eq!(prober.calls(), 0);
    assert!(handle.is_finished());
    assert!(status.snapshot().await.recent.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cycles_are_spaced_by_interval() {
    let prober = ScriptedProber::always(ProbeResult::Status(200));
    let status = StatusLog::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let ping = SelfPingLoop::new(config(true, 30, 0), prober.clone(), status.clone());
    let state = ping.subscribe();
    let handle = ping.spawn(shutdown_rx);

    // Probes at t=0, 30, 60 and 90.
    tokio::time::sleep(Duration::from_secs(95)).await;
    assert_eq!(prober.calls(), 4);

    let snapshot = status.snapshot().await;
    assert_eq!(snapshot.recent.len(), 3);
    assert_eq!(snapshot.target_url.as_deref(), Some("http://127.0.0.1:5000/"));
    assert_eq!(snapshot.interval_secs, Some(30));
    assert_eq!(snapshot.last_status, Some(ProbeResult::Status(200)));

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();
    assert_eq!(*state.borrow(), SelfPingState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_floor_prevents_probe_storm() {
    let prober = ScriptedProber::always(ProbeResult::Status(204));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = SelfPingLoop::new(config(true, 0, 0), prober.clone(), StatusLog::new())
        .spawn(shutdown_rx);

    // A zero interval still waits the 30s floor: probes at t=0, 30, 60.
    tokio::time::sleep(Duration::from_secs(75)).await;
    assert_eq!(prober.calls(), 3);

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_failures_do_not_stop_the_loop() {
    let prober = ScriptedProber::script(
        vec![
            ProbeResult::Failure("connection refused".to_string()),
            ProbeResult::Failure("dns error".to_string()),
        ],
        ProbeResult::Status(200),
    );
    let status = StatusLog::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = SelfPingLoop::new(config(true, 30, 0), prober.clone(), status.clone())
        .spawn(shutdown_rx);

    tokio::time::sleep(Duration::from_secs(65)).await;
    assert_eq!(prober.calls(), 3);

    let snapshot = status.snapshot().await;
    let results: Vec<_> = snapshot.recent.iter().map(|o| o.result.clone()).collect();
    assert_eq!(
        results,
        vec![
            ProbeResult::Status(200),
            ProbeResult::Failure("dns error".to_string()),
            ProbeResult::Failure("connection refused".to_string()),
        ]
    );

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_interrupts_interval_wait() {
    let prober = ScriptedProber::always(ProbeResult::Status(200));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = SelfPingLoop::new(config(true, 780, 30), prober.clone(), StatusLog::new())
        .spawn(shutdown_rx);

    // Past the pre-ping jitter, well inside the post-ping wait.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(prober.calls(), 1);

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("loop did not stop on shutdown")
        .unwrap();
    assert_eq!(prober.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_huge_interval_keeps_loop_alive() {
    let prober = ScriptedProber::always(ProbeResult::Status(200));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = SelfPingLoop::new(config(true, u64::MAX, 0), prober.clone(), StatusLog::new())
        .spawn(shutdown_rx);

    tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
    assert_eq!(prober.calls(), 1);
    assert!(!handle.is_finished());

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();
}
