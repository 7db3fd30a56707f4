use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn status_routes() -> Router<Arc<AppState>> {
    Router::new().route("/status", get(controller::get_status))
}
