use axum::{
    extract::Request,
    http::header::USER_AGENT,
    middleware::Next,
    response::Response,
};
use once_cell::sync::Lazy;
use regex::RegexSet;
use tracing::warn;

use crate::errors::AppError;

/// Case-insensitive user-agent signatures of crawlers, CLI clients and runtime fetch libraries.
const BOT_PATTERNS: &[&str] = &[
    r"(?i)bot|crawler|spider|scraper",
    r"(?i)curl|wget|postman|insomnia|httpie",
    r"(?i)python-requests|python-urllib|aiohttp|axios|node-fetch|undici|go-http-client|java/|okhttp|libwww-perl",
];

static BOT_SIGNATURES: Lazy<RegexSet> =
    Lazy::new(|| RegexSet::new(BOT_PATTERNS).expect("bot patterns are valid regexes"));

pub fn is_bot_user_agent(user_agent: &str) -> bool {
    BOT_SIGNATURES.is_match(user_agent)
}

/// Rejects blocked user agents before the body is read. A missing header passes.
pub async fn bot_guard(req: Request, next: Next) -> Result<Response, AppError> {
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if is_bot_user_agent(user_agent) {
        warn!("Blocked request from user agent {user_agent:?}");
        return Err(AppError::BotDetected);
    }

    Ok(next.run(req).await)
}
