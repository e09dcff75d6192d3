// Per-client rate limiting on /api/* backed by a keyed governor limiter.

use std::net::SocketAddr;
use std::num::NonZeroU32;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::{Clock, DefaultClock},
    middleware::NoOpMiddleware,
    state::keyed::DashMapStateStore,
    Quota,
};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

/// Above this many tracked clients, idle entries are dropped on the next check.
const SWEEP_THRESHOLD: usize = 1024;

type KeyedLimiter<C> = governor::RateLimiter<
    String,
    DashMapStateStore<String>,
    C,
    NoOpMiddleware<<C as Clock>::Instant>,
>;

/// `limit` requests per minute per client, with bursts of up to `limit`.
pub struct RateLimiter<C = DefaultClock>
where
    C: Clock,
{
    limiter: KeyedLimiter<C>,
    clock: C,
}

impl RateLimiter {
    pub fn per_minute(limit: u32) -> Self {
        Self::with_clock(limit, DefaultClock::default())
    }
}

impl<C: Clock> RateLimiter<C> {
    /// A limit of 0 is treated as 1.
    pub fn with_clock(limit: u32, clock: C) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(limit).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: KeyedLimiter::<C>::dashmap_with_clock(quota, &clock),
            clock,
        }
    }

    /// Counts one request for `key`. On rejection returns whole seconds until the next one is allowed.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        if self.limiter.len() > SWEEP_THRESHOLD {
            self.limiter.retain_recent();
        }

        self.limiter.check_key(&key.to_string()).map_err(|not_until| {
            let wait = not_until.wait_time_from(self.clock.now());
            (wait.as_secs_f64().ceil() as u64).max(1)
        })
    }

    fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Peer address when the server was started with connect info, else the first
/// `X-Forwarded-For` hop, else a shared anonymous bucket.
fn client_key(req: &Request) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "anonymous".to_string())
}

pub async fn rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&req);

    if let Err(retry_after_secs) = state.rate_limiter.check(&key) {
        warn!(
            "Rate limit exceeded for client {key} ({} tracked)",
            state.rate_limiter.tracked_clients()
        );
        return Err(AppError::RateLimited { retry_after_secs });
    }

    Ok(next.run(req).await)
}
