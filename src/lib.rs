pub mod config;
pub mod modules;
pub mod services;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use config::Config;
use modules::metrics::metrics_routes;
use modules::status::status_routes;
use services::alert::notifier_from_config;
use services::keepalive::{ExternalMonitor, HttpProber, Probe, SelfPingLoop, StatusLog};
use services::metrics::{metrics_middleware, MetricsError, MetricsRegistry};
use services::rate_limit::{create_rate_limiter, rate_limit};
use services::security::security_headers;

pub struct AppState {
    /// Written only by the self-ping loop.
    pub self_ping_status: StatusLog,
    /// Written only by the external monitor.
    pub monitor_status: StatusLog,
    pub status_token: Option<String>,
    pub metrics: Arc<MetricsRegistry>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Metrics initialization failed: {0}")]
    Metrics(#[from] MetricsError),
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn create_app(state: Arc<AppState>, rate_limit_burst: u32) -> Router {
    let rate_limiter = create_rate_limiter(rate_limit_burst);
    let metrics = state.metrics.clone();

    // `/` and `/health` are the self-ping targets and stay unthrottled.
    let limited = status_routes()
        .with_state(state)
        .merge(metrics_routes(metrics.clone()))
        .route_layer(middleware::from_fn_with_state(rate_limiter, rate_limit));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(limited)
        .layer(middleware::from_fn_with_state(metrics, metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(1024 * 16)) // 16KB max body
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Run both background loops and the HTTP server on an already bound
/// listener until `shutdown` resolves.
/// The listener is bound before either loop starts.
pub async fn serve<S>(listener: TcpListener, config: Config, shutdown: S) -> Result<(), ServerError>
where
    S: Future<Output = ()> + Send + 'static,
{
    let metrics = MetricsRegistry::new()?;
    let prober: Arc<dyn Probe> = Arc::new(HttpProber::new());
    let notifier = notifier_from_config(&config.alert);
    let self_ping_status = StatusLog::new();
    let monitor_status = StatusLog::new();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let self_ping = SelfPingLoop::new(config.self_ping.clone(), prober.clone(), self_ping_status.clone())
        .with_metrics(metrics.clone())
        .spawn(shutdown_rx.clone());
    tracing::info!(enabled = config.self_ping.enabled, "Self-ping task initialized");

    let monitor = ExternalMonitor::new(
        config.external_monitor.clone(),
        prober,
        notifier,
        monitor_status.clone(),
    )
    .with_metrics(metrics.clone())
    .spawn(shutdown_rx);

    let state = Arc::new(AppState {
        self_ping_status,
        monitor_status,
        status_token: config.server.status_token.clone(),
        metrics,
    });
    let app = create_app(state, config.server.rate_limit_burst);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;
    let _ = shutdown_tx.send(true);

    let (self_ping, monitor) = tokio::join!(self_ping, monitor);
    for (name, result) in [("self-ping", self_ping), ("external monitor", monitor)] {
        if let Err(e) = result {
            tracing::error!(task = name, error = %e, "Background task ended abnormally");
        }
    }

    served.map_err(ServerError::from)
}

/// Target of the default self-ping URL.
async fn root() -> &'static str {
    "Monitor App is running"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
