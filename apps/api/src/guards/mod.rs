//! Request-level guards applied before handlers run.
//!
//! - `bot`: user-agent blocklist on the generation route (403 BOT_DETECTED)
//! - `rate_limit`: fixed-window per-client limiter on `/api/*` (429 RATE_LIMIT_EXCEEDED)
//!
//! The 10 KiB payload cap is an axum `DefaultBodyLimit` on the generation route;
//! see `routes::MAX_PAYLOAD_BYTES`.

pub mod bot;
pub mod rate_limit;
