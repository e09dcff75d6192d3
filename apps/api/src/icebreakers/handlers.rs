//! Axum route handler for icebreaker generation.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tokio::time::Instant;
use tracing::info;

use crate::errors::AppError;
use crate::icebreakers::classify::ErrorClass;
use crate::icebreakers::prompts::build_prompt;
use crate::icebreakers::validation::validate_request;
use crate::models::analytics::NewAnalyticsEvent;
use crate::models::icebreaker::{GenerateIcebreakersRequest, GenerationResult, Style};
use crate::state::AppState;

/// POST /api/generate-icebreakers
///
/// validate → build prompt → model fallback pipeline → respond.
/// Every outcome except an oversized body is recorded in analytics.
pub async fn handle_generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateIcebreakersRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, AppError> {
    let Json(raw) = match body {
        Ok(json) => json,
        Err(rejection) => {
            let err = reject_body(rejection);
            if let AppError::Validation(_) = err {
                state
                    .analytics
                    .record(NewAnalyticsEvent::failed(None, None, err.code()))
                    .await;
            }
            return Err(err);
        }
    };
    let started = Instant::now();

    let request = match validate_request(&raw, state.config.max_profile_chars) {
        Ok(request) => request,
        Err(err) => {
            let style = raw.style.as_deref().and_then(Style::parse);
            let length = raw.profile_text.chars().count();
            state
                .analytics
                .record(NewAnalyticsEvent::failed(style, Some(length), err.code()))
                .await;
            return Err(err);
        }
    };

    let profile_length = request.profile_text.chars().count();
    let prompt = build_prompt(&request, &state.config.sender_context);

    match state.generator.generate(&prompt).await {
        Ok(result) => {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            info!(
                "Generated icebreakers in {elapsed_ms}ms (style={}, profile_length={profile_length})",
                request.style
            );
            state
                .analytics
                .record(NewAnalyticsEvent::generated(
                    request.style,
                    profile_length,
                    elapsed_ms,
                ))
                .await;
            Ok(Json(result))
        }
        Err(err) => {
            state
                .analytics
                .record(NewAnalyticsEvent::failed(
                    Some(request.style),
                    Some(profile_length),
                    err.class.code(),
                ))
                .await;
            Err(err.into())
        }
    }
}

fn reject_body(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(ErrorClass::ValidationError.user_message().to_string())
    }
}
