use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::MonitorConfig;
use crate::services::metrics::MetricsRegistry;

use super::jitter::{post_ping_delay, pre_ping_delay};
use super::prober::{Probe, DEFAULT_PROBE_TIMEOUT};
use super::shutdown::sleep_or_shutdown;
use super::status_log::StatusLog;
use super::types::{ProbeOutcome, ProbeResult};

const LOOP_LABEL: &str = "self_ping";

/// Where the self-ping loop currently is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfPingState {
    /// `ENABLE_SELF_PING` was not "1". Terminal.
    Disabled,
    Idle,
    PrePingJitterWait,
    Probing,
    PostPingIntervalWait,
    /// Shutdown was signalled.
    Stopped,
}

/// Pings the service's own URL so the hosting platform does not idle it out.
pub struct SelfPingLoop {
    config: MonitorConfig,
    prober: Arc<dyn Probe>,
    status: StatusLog,
    metrics: Option<Arc<MetricsRegistry>>,
    state: watch::Sender<SelfPingState>,
}

impl SelfPingLoop {
    pub fn new(config: MonitorConfig, prober: Arc<dyn Probe>, status: StatusLog) -> Self {
        let initial = if config.enabled {
            SelfPingState::Idle
        } else {
            SelfPingState::Disabled
        };
        let (state, _) = watch::channel(initial);

        Self {
            config,
            prober,
            status,
            metrics: None,
            state,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn state(&self) -> SelfPingState {
        *self.state.borrow()
    }

    /// Observe state transitions from another task.
    pub fn subscribe(&self) -> watch::Receiver<SelfPingState> {
        self.state.subscribe()
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    /// Run until shutdown. Returns at once when disabled.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        if !self.config.enabled {
            tracing::info!("Self-ping disabled (ENABLE_SELF_PING != 1)");
            self.state.send_replace(SelfPingState::Disabled);
            return;
        }

        let MonitorConfig {
            target_url,
            base_interval_secs,
            jitter_secs,
            min_interval_floor_secs,
            ..
        } = &self.config;

        self.status.configure(target_url, *base_interval_secs).await;
        tracing::info!(
            %target_url,
            interval_secs = base_interval_secs,
            jitter_secs = jitter_secs,
            "Starting self-ping"
        );

        loop {
            self.state.send_replace(SelfPingState::PrePingJitterWait);
            if !sleep_or_shutdown(pre_ping_delay(*jitter_secs), &mut shutdown).await {
                break;
            }

            self.state.send_replace(SelfPingState::Probing);
            self.ping_once().await;

            self.state.send_replace(SelfPingState::PostPingIntervalWait);
            let delay = post_ping_delay(*base_interval_secs, *jitter_secs, *min_interval_floor_secs);
            tracing::debug!(delay_secs = delay.as_secs_f64(), "next self-ping scheduled");
            if !sleep_or_shutdown(delay, &mut shutdown).await {
                break;
            }

            self.state.send_replace(SelfPingState::Idle);
        }

        self.state.send_replace(SelfPingState::Stopped);
        tracing::info!("Self-ping loop stopped");
    }

    /// Probe the target once and record the outcome.
    pub async fn ping_once(&self) -> ProbeOutcome {
        let target_url = &self.config.target_url;
        let started = Instant::now();
        let result = self.prober.probe(target_url, DEFAULT_PROBE_TIMEOUT).await;
        let outcome = ProbeOutcome::new(target_url.as_str(), result);

        match &outcome.result {
            ProbeResult::Status(code) if outcome.result.is_healthy() => {
                tracing::info!(status = code, %target_url, "Self-ping ok");
            }
            ProbeResult::Status(code) => {
                tracing::warn!(status = code, %target_url, "Self-ping returned non-success status");
            }
            ProbeResult::Failure(detail) => {
                tracing::error!(error = %detail, %target_url, "Self-ping failed");
            }
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_probe(LOOP_LABEL, &outcome.result, started.elapsed());
        }

        self.status.record(outcome.clone()).await;
        outcome
    }
}
