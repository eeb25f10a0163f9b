//! Application-layer rate limiting for the order, check-in and
//! cancellation entry points
//!
//! Budgets are tracked per authenticated identity, falling back to the
//! client IP for requests without a valid token. The limiter is a
//! cooperating but independent resource: when its bookkeeping cannot
//! produce a decision the request passes through unimpeded — admission
//! and check-in correctness never depend on it.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::auth::JwtService;
use crate::core::ServerState;
use crate::utils::AppError;

struct WindowEntry {
    count: u32,
    window_start: Instant,
}

/// Structured limiter verdict surfaced to the caller on rejection
#[derive(Debug, Clone, Copy)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub reset_secs: u64,
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    /// route name -> (key -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, WindowEntry>>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Count the request against the key's sliding window.
    ///
    /// Returns `None` when no decision could be made; callers treat that
    /// as allowed (fail open).
    async fn check(
        &self,
        route: &'static str,
        key: &str,
        max_requests: u32,
        window_secs: u64,
    ) -> Option<RateDecision> {
        let mut map = self.inner.lock().await;
        let route_map = map.entry(route).or_default();
        let now = Instant::now();

        let entry = route_map.entry(key.to_owned()).or_insert_with(|| WindowEntry {
            count: 0,
            window_start: now,
        });

        // Reset window if expired
        let elapsed = now.duration_since(entry.window_start).as_secs();
        if elapsed >= window_secs {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        Some(RateDecision {
            allowed: entry.count <= max_requests,
            limit: max_requests,
            reset_secs: window_secs.saturating_sub(elapsed),
        })
    }

    /// Remove entries older than 5 minutes
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let cutoff = std::time::Duration::from_secs(300);
        let now = Instant::now();

        for route_map in map.values_mut() {
            route_map.retain(|_, entry| now.duration_since(entry.window_start) < cutoff);
        }

        // Remove empty route maps
        map.retain(|_, route_map| !route_map.is_empty());
    }
}

/// Extract the budget key: authenticated identity first, then client IP.
///
/// IP resolution checks X-Forwarded-For (proxy setups) before the peer
/// address.
fn extract_key(state: &ServerState, request: &Request) -> String {
    if let Some(header) = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        && let Some(token) = JwtService::extract_from_header(header)
        && let Ok(claims) = state.get_jwt_service().validate_token(token)
    {
        return format!("user:{}", claims.sub);
    }

    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
    {
        // X-Forwarded-For can be comma-separated; first entry is the original client
        if let Some(first) = val.split(',').next() {
            let ip = first.trim();
            if !ip.is_empty() {
                return format!("ip:{ip}");
            }
        }
    }

    // Fallback: peer address from extensions (ConnectInfo)
    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| format!("ip:{}", ci.0.ip()))
        .unwrap_or_else(|| "ip:unknown".to_owned())
}

async fn enforce(
    state: ServerState,
    request: Request,
    next: Next,
    route: &'static str,
    max_requests: u32,
    window_secs: u64,
) -> Result<Response, AppError> {
    let key = extract_key(&state, &request);
    match state
        .rate_limiter
        .check(route, &key, max_requests, window_secs)
        .await
    {
        Some(decision) if !decision.allowed => {
            tracing::warn!(route, key = %key, "request budget exceeded");
            Err(AppError::rate_limited(decision.limit, decision.reset_secs))
        }
        // Allowed, or no decision available (fail open)
        _ => Ok(next.run(request).await),
    }
}

/// Rate limit middleware for reservation creation: 10 requests/minute
pub async fn order_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(state, request, next, "order", 10, 60).await
}

/// Rate limit middleware for check-in: 30 requests/minute
pub async fn checkin_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(state, request, next, "checkin", 30, 60).await
}

/// Rate limit middleware for cancellation: 10 requests/minute
pub async fn cancel_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(state, request, next, "cancel", 10, 60).await
}
