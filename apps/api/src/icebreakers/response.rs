//! Structural check applied to every raw model reply.
//!
//! A reply passes only if `icebreakers` is an array of exactly 3 objects, each with
//! non-empty string `line1` and `line2`, and every line is at most 18 words.
//! There is no partial acceptance and no truncation-to-fit.

use serde_json::Value;
use thiserror::Error;

use crate::llm_client::strip_json_fences;
use crate::models::icebreaker::GenerationResult;

pub const REQUIRED_SUGGESTIONS: usize = 3;
pub const MAX_WORDS_PER_LINE: usize = 18;

#[derive(Debug, Error, PartialEq)]
pub enum ReplyViolation {
    #[error("reply is not valid JSON: {0}")]
    NotJson(String),

    #[error("reply has no `icebreakers` array")]
    MissingIcebreakers,

    #[error("expected 3 icebreakers, got {0}")]
    WrongCount(usize),

    #[error("icebreaker {index} is missing a non-empty `{field}`")]
    EmptyLine { index: usize, field: &'static str },

    #[error("icebreaker {index} `{field}` has {words} words (max 18)")]
    LineTooLong {
        index: usize,
        field: &'static str,
        words: usize,
    },
}

/// Whitespace-delimited word count; empty tokens are not words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Checks the shape of an already-parsed reply.
pub fn validate_reply(reply: &Value) -> Result<(), ReplyViolation> {
    let icebreakers = reply
        .get("icebreakers")
        .and_then(Value::as_array)
        .ok_or(ReplyViolation::MissingIcebreakers)?;

    if icebreakers.len() != REQUIRED_SUGGESTIONS {
        return Err(ReplyViolation::WrongCount(icebreakers.len()));
    }

    for (index, item) in icebreakers.iter().enumerate() {
        for field in ["line1", "line2"] {
            let line = item
                .get(field)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .ok_or(ReplyViolation::EmptyLine { index, field })?;

            let words = count_words(line);
            if words > MAX_WORDS_PER_LINE {
                return Err(ReplyViolation::LineTooLong {
                    index,
                    field,
                    words,
                });
            }
        }
    }

    Ok(())
}

/// Parses raw completion text, validates it, and converts it to a `GenerationResult`.
pub fn parse_reply(raw: &str) -> Result<GenerationResult, ReplyViolation> {
    let value: Value = serde_json::from_str(strip_json_fences(raw))
        .map_err(|e| ReplyViolation::NotJson(e.to_string()))?;

    validate_reply(&value)?;

    // `notes` of the wrong type is treated as absent.
    let notes = value
        .get("notes")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let icebreakers = serde_json::from_value(value["icebreakers"].clone())
        .map_err(|e| ReplyViolation::NotJson(e.to_string()))?;

    Ok(GenerationResult { icebreakers, notes }.with_default_notes())
}
