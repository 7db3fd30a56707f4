use std::time::Duration;

use keepalive_monitor::services::keepalive::{HttpProber, Probe, ProbeError, ProbeResult};

use crate::common::spawn_http_target;

// =============================================================================
// INTEGRATION TESTS - HTTP PROBER
// =============================================================================

#[tokio::test]
async fn test_reachable_target_returns_status() {
    let base = spawn_http_target().await;
    let prober = HttpProber::new();

    let result = prober.probe(&format!("{}/", base), Duration::from_secs(5)).await;
    assert_eq!(result, ProbeResult::Status(200));
    assert!(result.is_healthy());
}

#[tokio::test]
async fn test_error_codes_are_recorded_verbatim() {
    let base = spawn_http_target().await;
    let prober = HttpProber::new();

    let missing = prober.probe(&format!("{}/missing", base), Duration::from_secs(5)).await;
    assert_eq!(missing, ProbeResult::Status(404));
    assert!(missing.is_reachable());

    let broken = prober.probe(&format!("{}/broken", base), Duration::from_secs(5)).await;
    assert_eq!(broken, ProbeResult::Status(500));
}

#[tokio::test]
async fn test_redirects_are_not_followed() {
    let base = spawn_http_target().await;
    let prober = HttpProber::new();

    let result = prober.probe(&format!("{}/moved", base), Duration::from_secs(5)).await;
    assert_eq!(result, ProbeResult::Status(307));
}

#[tokio::test]
async fn test_refused_connection_yields_failure_detail() {
    // Nothing listens on port 1.
    let prober = HttpProber::new();
    let result = prober.probe("http://127.0.0.1:1/", Duration::from_secs(5)).await;

    match result {
        ProbeResult::Failure(detail) => {
            assert!(!detail.is_empty());
            assert!(detail.contains("127.0.0.1:1"), "detail was {:?}", detail);
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_target_times_out() {
    let base = spawn_http_target().await;
    let prober = HttpProber::new();

    let err = prober
        .try_probe(&format!("{}/slow", base), Duration::from_millis(200))
        .await
        .unwrap_err();
    assert!(matches!(err, ProbeError::Timeout { .. }), "got {:?}", err);

    let result = prober.probe(&format!("{}/slow", base), Duration::from_millis(200)).await;
    assert!(matches!(result, ProbeResult::Failure(ref d) if d.contains("timed out")));
}
