//! Static input rules applied before any LLM call. First failing rule wins.

use crate::errors::AppError;
use crate::models::icebreaker::{GenerateIcebreakersRequest, ProfileRequest, Style};

pub const MIN_PROFILE_CHARS: usize = 10;
pub const DEFAULT_MAX_PROFILE_CHARS: usize = 5000;

/// A run of this many identical characters is treated as spam.
const MAX_REPEAT_RUN: usize = 11;

/// Text whose alphabetic share is at or below this ratio is rejected.
const MIN_ALPHABETIC_RATIO: f64 = 0.30;

/// Validates a raw request and returns the normalized `ProfileRequest`.
///
/// Rules, in order:
/// 1. trimmed length within `[MIN_PROFILE_CHARS, max_chars]` (Unicode scalar values)
/// 2. no character repeated `MAX_REPEAT_RUN` or more times in a row
/// 3. alphabetic characters make up more than `MIN_ALPHABETIC_RATIO` of the text
/// 4. `style` is a known preset; absent or blank means `professional`
pub fn validate_request(
    raw: &GenerateIcebreakersRequest,
    max_chars: usize,
) -> Result<ProfileRequest, AppError> {
    let text = raw.profile_text.trim();
    let len = text.chars().count();

    if len < MIN_PROFILE_CHARS {
        return Err(AppError::Validation(format!(
            "Profile text must be at least {MIN_PROFILE_CHARS} characters"
        )));
    }
    if len > max_chars {
        return Err(AppError::Validation(format!(
            "Profile text too long (maximum {max_chars} characters)"
        )));
    }
    if longest_repeat_run(text) >= MAX_REPEAT_RUN {
        return Err(AppError::Validation(
            "Profile text contains too many repeated characters".to_string(),
        ));
    }
    if alphabetic_ratio(text) <= MIN_ALPHABETIC_RATIO {
        return Err(AppError::Validation(
            "Profile text does not appear to contain meaningful content".to_string(),
        ));
    }

    let style = match raw.style.as_deref().map(str::trim) {
        None | Some("") => Style::default(),
        Some(s) => Style::parse(s).ok_or_else(|| {
            AppError::Validation("Style must be one of: professional, casual, creative".to_string())
        })?,
    };

    Ok(ProfileRequest {
        profile_text: text.to_string(),
        style,
    })
}

fn longest_repeat_run(text: &str) -> usize {
    let mut longest = 0;
    let mut run = 0;
    let mut prev = None;

    for c in text.chars() {
        if Some(c) == prev {
            run += 1;
        } else {
            run = 1;
            prev = Some(c);
        }
        longest = longest.max(run);
    }
    longest
}

fn alphabetic_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let alphabetic = text.chars().filter(|c| c.is_alphabetic()).count();
    alphabetic as f64 / total as f64
}
