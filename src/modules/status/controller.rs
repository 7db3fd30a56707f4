use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::AppState;
use super::schema::{StatusQuery, StatusResponse};

/// Handler for GET /status
/// Returns the self-ping and external monitor history, or 403 when the
/// configured token is not supplied.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Response {
    let supplied = query.map(|Query(q)| q).unwrap_or_default().token;

    if !is_authorized(state.status_token.as_deref(), supplied.as_deref()) {
        tracing::warn!("status query rejected: token mismatch");
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    let self_ping = state.self_ping_status.snapshot().await;
    let external = state.monitor_status.snapshot().await;

    (StatusCode::OK, Json(StatusResponse::new(self_ping, external))).into_response()
}

fn is_authorized(expected: Option<&str>, supplied: Option<&str>) -> bool {
    match expected {
        None => true,
        Some(expected) => supplied == Some(expected),
    }
}
