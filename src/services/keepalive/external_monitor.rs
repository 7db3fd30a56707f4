use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::ExternalMonitorConfig;
use crate::services::alert::AlertNotifier;
use crate::services::metrics::MetricsRegistry;

use super::prober::{Probe, DEFAULT_PROBE_TIMEOUT};
use super::shutdown::until_shutdown;
use super::status_log::StatusLog;
use super::types::{AlertEvent, ProbeOutcome};

const LOOP_LABEL: &str = "external_monitor";

/// Watches an operator-chosen URL on a fixed cadence and raises an alert
/// whenever it cannot be reached.
pub struct ExternalMonitor {
    config: ExternalMonitorConfig,
    prober: Arc<dyn Probe>,
    notifier: Arc<dyn AlertNotifier>,
    status: StatusLog,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl ExternalMonitor {
    pub fn new(
        config: ExternalMonitorConfig,
        prober: Arc<dyn Probe>,
        notifier: Arc<dyn AlertNotifier>,
        status: StatusLog,
    ) -> Self {
        Self {
            config,
            prober,
            notifier,
            status,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs(self.config.interval_secs())
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    /// Tick every `MONITOR_INTERVAL` minutes until shutdown. The first check
    /// happens one full period after start.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        if !self.config.enabled {
            tracing::info!("External monitor disabled (ENABLE_MONITOR=0)");
            return;
        }

        let period = self.period();
        self.status
            .configure(&self.config.target_url, self.config.interval_secs())
            .await;
        tracing::info!(
            target_url = %self.config.target_url,
            interval_minutes = self.config.interval_minutes,
            "Scheduled HTTP monitoring"
        );

        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while until_shutdown(ticker.tick(), &mut shutdown).await.is_some() {
            self.check_once().await;
        }

        tracing::info!("External monitor stopped");
    }

    /// One scheduled job: probe, record, alert on failure.
    pub async fn check_once(&self) -> ProbeOutcome {
        let target_url = &self.config.target_url;
        tracing::debug!(%target_url, "Starting HTTP monitoring check");

        let started = Instant::now();
        let result = self.prober.probe(target_url, DEFAULT_PROBE_TIMEOUT).await;
        let outcome = ProbeOutcome::new(target_url.as_str(), result);

        if let Some(metrics) = &self.metrics {
            metrics.record_probe(LOOP_LABEL, &outcome.result, started.elapsed());
        }
        self.status.record(outcome.clone()).await;

        match AlertEvent::from_outcome(&outcome) {
            None => {
                tracing::info!(status = %outcome.result, %target_url, "Monitored target reachable");
            }
            Some(event) => {
                tracing::error!(error = %event.detail, %target_url, "Monitored target unreachable");
                self.raise_alert(&event).await;
            }
        }

        outcome
    }

    async fn raise_alert(&self, event: &AlertEvent) {
        let delivered = match self.notifier.notify(event).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, target_url = %event.target, "Failed to send alert");
                false
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_alert(delivered);
        }
    }
}
