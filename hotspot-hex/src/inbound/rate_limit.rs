//! Rate limiting middleware using Governor.
//!
//! Implements per-device rate limiting with a token bucket algorithm. The
//! device is identified by the `mac` query parameter that every portal
//! endpoint carries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::{num::NonZeroU32, sync::Arc, time::Duration};

use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    Quota, RateLimiter,
    clock::{self, DefaultClock},
    middleware::NoOpMiddleware,
    state::keyed::DefaultKeyedStateStore,
};
use serde_json::json;

/// Number of checks between two sweeps of idle device entries.
const SWEEP_INTERVAL: u64 = 1024;

type DeviceLimiter<C> = RateLimiter<
    String,
    DefaultKeyedStateStore<String>,
    C,
    NoOpMiddleware<<C as clock::Clock>::Instant>,
>;

/// Rate limiter state shared across requests.
///
/// Device keys come from an unauthenticated query parameter, so entries
/// whose bucket has fully refilled are dropped every [`SWEEP_INTERVAL`]
/// checks.
pub struct RateLimiterState<C: clock::Clock = DefaultClock> {
    limiter: DeviceLimiter<C>,
    checks: AtomicU64,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(120, Duration::from_secs(60))
    }
}

impl RateLimiterState {
    /// Creates a new rate limiter state.
    ///
    /// # Arguments
    /// * `requests` - Number of requests allowed per period (minimum 1)
    /// * `period` - Time period over which the quota refills
    pub fn new(requests: u32, period: Duration) -> Self {
        Self::with_clock(requests, period, DefaultClock::default())
    }
}

impl<C: clock::Clock> RateLimiterState<C> {
    /// Creates a rate limiter state driven by `clock`.
    pub fn with_clock(requests: u32, period: Duration, clock: C) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        let replenish = period / burst.get();
        let quota = Quota::with_period(replenish)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiter: RateLimiter::new(quota, DefaultKeyedStateStore::default(), clock),
            checks: AtomicU64::new(0),
        }
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_INTERVAL == SWEEP_INTERVAL - 1 {
            self.sweep();
        }

        self.limiter.check_key(&key.to_string()).is_ok()
    }

    /// Drops devices whose bucket is indistinguishable from a fresh one.
    pub fn sweep(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        tracing::debug!(devices = self.limiter.len(), "rate limiter swept");
    }

    /// Number of devices currently holding limiter state.
    pub fn tracked_devices(&self) -> usize {
        self.limiter.len()
    }
}

fn device_key(request: &Request<Body>) -> String {
    Query::<HashMap<String, String>>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(params)| params.get("mac").cloned())
        .filter(|mac| !mac.is_empty())
        .unwrap_or_else(|| "anonymous".to_string())
}

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Skip rate limiting for health endpoint
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let key = device_key(&request);

    if !limiter.check(&key) {
        tracing::warn!(device = %key, "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "retry_after_seconds": 60
            })),
        )
            .into_response();
    }

    next.run(request).await
}
