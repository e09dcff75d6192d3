use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::icebreaker::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsEventKind {
    IcebreakerGenerated,
    GenerationFailed,
}

/// An event as handed to the recorder; `id` and `timestamp` are assigned on record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalyticsEvent {
    pub event: AnalyticsEventKind,
    pub style: Option<Style>,
    pub success: bool,
    pub profile_length: Option<usize>,
    pub generation_time_ms: Option<u64>,
    pub error_type: Option<String>,
}

impl NewAnalyticsEvent {
    pub fn generated(style: Style, profile_length: usize, generation_time_ms: u64) -> Self {
        Self {
            event: AnalyticsEventKind::IcebreakerGenerated,
            style: Some(style),
            success: true,
            profile_length: Some(profile_length),
            generation_time_ms: Some(generation_time_ms),
            error_type: None,
        }
    }

    pub fn failed(
        style: Option<Style>,
        profile_length: Option<usize>,
        error_type: impl Into<String>,
    ) -> Self {
        Self {
            event: AnalyticsEventKind::GenerationFailed,
            style,
            success: false,
            profile_length,
            generation_time_ms: None,
            error_type: Some(error_type.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: AnalyticsEventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_length: Option<usize>,
    #[serde(rename = "generationTime", skip_serializing_if = "Option::is_none")]
    pub generation_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl AnalyticsEvent {
    pub fn stamp(new: NewAnalyticsEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event: new.event,
            style: new.style,
            success: new.success,
            profile_length: new.profile_length,
            generation_time_ms: new.generation_time_ms,
            error_type: new.error_type,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleBreakdown {
    pub professional: usize,
    pub casual: usize,
    pub creative: usize,
}

/// Aggregate view over the most recent window of events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsStats {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    /// Percentage, 0–100.
    pub success_rate: f64,
    pub style_breakdown: StyleBreakdown,
    /// Milliseconds, averaged over successful events only.
    pub average_generation_time: f64,
    pub recent_events: Vec<AnalyticsEvent>,
}
