mod analytics;
mod config;
mod errors;
mod guards;
mod icebreakers;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analytics::InMemoryAnalytics;
use crate::config::Config;
use crate::guards::rate_limit::RateLimiter;
use crate::icebreakers::generator::IcebreakerGenerator;
use crate::llm_client::OpenAiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Icebreaker API v{}", env!("CARGO_PKG_VERSION"));

    if !config.api_key_configured() {
        warn!("OPENAI_API_KEY is not set; generation requests will fail with API_KEY_ERROR");
    }

    // Initialize LLM client and fallback chain
    let provider = Arc::new(OpenAiClient::new(
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
    )?);
    let generator = IcebreakerGenerator::new(provider, config.models.clone());
    let chain: Vec<&str> = generator.models().iter().map(|m| m.name.as_str()).collect();
    info!("LLM client initialized (models: {})", chain.join(" -> "));

    let analytics = InMemoryAnalytics::new(config.analytics_capacity);
    info!("Analytics recorder initialized (capacity: {})", analytics.capacity());

    let rate_limiter = RateLimiter::per_minute(config.rate_limit_per_minute);

    let state = AppState {
        config: config.clone(),
        generator,
        analytics: Arc::new(analytics),
        rate_limiter: Arc::new(rate_limiter),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
