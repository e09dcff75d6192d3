//! Error Classifier: maps pipeline failures onto the closed `ErrorClass` set.
//!
//! Structured signals (HTTP status, provider error code) are consulted first.
//! Message substrings are only a fallback: provider wording changes between
//! API versions, so they are not a contract.

use serde::Serialize;

use crate::icebreakers::response::ReplyViolation;
use crate::llm_client::LlmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorClass {
    ApiKeyError,
    QuotaExceeded,
    RateLimited,
    GenerationFailed,
    InvalidResponse,
    ValidationError,
    ServiceError,
}

impl ErrorClass {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorClass::ApiKeyError => "API_KEY_ERROR",
            ErrorClass::QuotaExceeded => "QUOTA_EXCEEDED",
            ErrorClass::RateLimited => "RATE_LIMITED",
            ErrorClass::GenerationFailed => "GENERATION_FAILED",
            ErrorClass::InvalidResponse => "INVALID_RESPONSE",
            ErrorClass::ValidationError => "VALIDATION_ERROR",
            ErrorClass::ServiceError => "SERVICE_ERROR",
        }
    }

    /// Client-safe message. Validator rule failures surface their own message instead.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorClass::ApiKeyError => "API configuration error - please check server settings",
            ErrorClass::QuotaExceeded => "Service quota exceeded - please try again later",
            ErrorClass::RateLimited => "Rate limit exceeded - please try again in a moment",
            ErrorClass::GenerationFailed => "Failed to generate icebreakers - please try again",
            ErrorClass::InvalidResponse => "Invalid response received - please try again",
            ErrorClass::ValidationError => "Request body must be a JSON object with a profileText string",
            ErrorClass::ServiceError => "Service temporarily unavailable - please try again",
        }
    }

    /// Account-level conditions: another model on the same account cannot help.
    pub fn halts_fallback(&self) -> bool {
        matches!(self, ErrorClass::ApiKeyError | ErrorClass::QuotaExceeded)
    }
}

/// Why a single model attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum AttemptFailure {
    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error("Invalid response structure: {0}")]
    InvalidReply(#[from] ReplyViolation),
}

/// Substring fallback used when no structured signal is available.
pub fn classify_message(message: &str) -> ErrorClass {
    let lower = message.to_lowercase();
    if lower.contains("api key") || lower.contains("api_key") {
        ErrorClass::ApiKeyError
    } else if lower.contains("quota") {
        ErrorClass::QuotaExceeded
    } else if lower.contains("rate limit") {
        ErrorClass::RateLimited
    } else if lower.contains("failed to generate") {
        ErrorClass::GenerationFailed
    } else if lower.contains("invalid response") {
        ErrorClass::InvalidResponse
    } else {
        ErrorClass::ServiceError
    }
}

pub fn classify_llm_error(err: &LlmError) -> ErrorClass {
    match err {
        LlmError::MissingApiKey => ErrorClass::ApiKeyError,
        LlmError::Api {
            status,
            message,
            code,
        } => match (*status, code.as_deref()) {
            (401, _) | (_, Some("invalid_api_key")) => ErrorClass::ApiKeyError,
            (_, Some("insufficient_quota")) => ErrorClass::QuotaExceeded,
            // A 429 can still be a quota problem when the body carries no code.
            (429, _) => match classify_message(message) {
                ErrorClass::QuotaExceeded => ErrorClass::QuotaExceeded,
                _ => ErrorClass::RateLimited,
            },
            _ => classify_message(message),
        },
        other => classify_message(&other.to_string()),
    }
}

pub fn classify(failure: &AttemptFailure) -> ErrorClass {
    match failure {
        AttemptFailure::Provider(err) => classify_llm_error(err),
        AttemptFailure::InvalidReply(_) => ErrorClass::InvalidResponse,
    }
}
