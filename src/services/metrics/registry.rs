use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

use crate::services::keepalive::ProbeResult;

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
    #[error("Metrics output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Central metrics registry for the keep-alive service
pub struct MetricsRegistry {
    registry: Registry,

    // HTTP Metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // Probe Metrics
    pub probes_total: CounterVec,
    pub probe_duration_seconds: HistogramVec,
    pub last_probe_status: GaugeVec,

    // Alert Metrics
    pub alerts_total: CounterVec,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, MetricsError> {
        let registry = Registry::new();

        // HTTP Metrics
        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests").namespace("keepalive"),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration")
                .namespace("keepalive")
                .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        // Probe Metrics
        let probes_total = CounterVec::new(
            Opts::new("probes_total", "Probes performed by outcome").namespace("keepalive"),
            &["loop", "outcome"],
        )?;
        registry.register(Box::new(probes_total.clone()))?;

        let probe_duration_seconds = HistogramVec::new(
            HistogramOpts::new("probe_duration_seconds", "Probe round-trip duration")
                .namespace("keepalive")
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["loop"],
        )?;
        registry.register(Box::new(probe_duration_seconds.clone()))?;

        let last_probe_status = GaugeVec::new(
            Opts::new(
                "last_probe_status_code",
                "Status code of the latest probe (0 on network failure)",
            )
            .namespace("keepalive"),
            &["loop"],
        )?;
        registry.register(Box::new(last_probe_status.clone()))?;

        // Alert Metrics
        let alerts_total = CounterVec::new(
            Opts::new("alerts_total", "Alerts raised by delivery result").namespace("keepalive"),
            &["result"],
        )?;
        registry.register(Box::new(alerts_total.clone()))?;

        Ok(Arc::new(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            probes_total,
            probe_duration_seconds,
            last_probe_status,
            alerts_total,
        }))
    }

    pub fn record_probe(&self, loop_name: &str, result: &ProbeResult, elapsed: Duration) {
        self.probes_total
            .with_label_values(&[loop_name, result.label()])
            .inc();
        self.probe_duration_seconds
            .with_label_values(&[loop_name])
            .observe(elapsed.as_secs_f64());

        let code = match result {
            ProbeResult::Status(code) => f64::from(*code),
            ProbeResult::Failure(_) => 0.0,
        };
        self.last_probe_status.with_label_values(&[loop_name]).set(code);
    }

    pub fn record_alert(&self, delivered: bool) {
        let result = if delivered { "sent" } else { "failed" };
        self.alerts_total.with_label_values(&[result]).inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
