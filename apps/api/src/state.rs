use std::sync::Arc;

use crate::analytics::AnalyticsRecorder;
use crate::config::Config;
use crate::guards::rate_limit::RateLimiter;
use crate::icebreakers::generator::IcebreakerGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Model fallback pipeline over the configured `CompletionProvider`.
    pub generator: IcebreakerGenerator,
    /// Pluggable analytics backend. Default: bounded in-memory ring.
    pub analytics: Arc<dyn AnalyticsRecorder>,
    pub rate_limiter: Arc<RateLimiter>,
}
