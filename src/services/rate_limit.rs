use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{num::NonZeroU32, sync::Arc};

/// One token bucket per matched route.
pub type RouteRateLimiter = Arc<DefaultKeyedRateLimiter<String>>;

/// Each route gets `burst` requests up front, then one per second.
pub fn create_rate_limiter(burst: u32) -> RouteRateLimiter {
    let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
    let quota = Quota::per_second(NonZeroU32::MIN).allow_burst(burst);
    Arc::new(RateLimiter::keyed(quota))
}

/// Reject with 429 once the caller's route has used up its bucket.
///
/// Installed with `route_layer`, so only the routes it wraps are counted.
pub async fn rate_limit(
    State(limiter): State<RouteRateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    if limiter.check_key(&route).is_err() {
        tracing::warn!(%route, "request rejected by rate limiter");
        return StatusCode::TOO_MANY_REQUESTS.into_response();
    }

    next.run(req).await
}
