//! Analytics Recorder: bounded, append-only log of generation outcomes.
//!
//! `AppState` holds an `Arc<dyn AnalyticsRecorder>`; the in-memory ring is the
//! default and only backend. Nothing is persisted across restarts.

pub mod handlers;

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::models::analytics::{AnalyticsEvent, AnalyticsStats, NewAnalyticsEvent, StyleBreakdown};
use crate::models::icebreaker::Style;

pub const DEFAULT_CAPACITY: usize = 1000;
pub const DEFAULT_STATS_LIMIT: usize = 100;
pub const RECENT_EVENTS: usize = 10;

#[async_trait]
pub trait AnalyticsRecorder: Send + Sync {
    async fn record(&self, event: NewAnalyticsEvent);

    /// Aggregates over the most recent `limit` events.
    async fn stats(&self, limit: usize) -> AnalyticsStats;
}

/// Ring buffer with FIFO eviction. Append and trim happen under one lock.
pub struct InMemoryAnalytics {
    capacity: usize,
    events: Mutex<VecDeque<AnalyticsEvent>>,
}

impl InMemoryAnalytics {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            events: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub async fn event_count(&self) -> usize {
        self.events.lock().await.len()
    }
}

impl Default for InMemoryAnalytics {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl AnalyticsRecorder for InMemoryAnalytics {
    async fn record(&self, event: NewAnalyticsEvent) {
        let event = AnalyticsEvent::stamp(event);
        let mut events = self.events.lock().await;
        events.push_back(event);
        while events.len() > self.capacity {
            events.pop_front();
        }
    }

    async fn stats(&self, limit: usize) -> AnalyticsStats {
        let limit = limit.clamp(1, self.capacity);
        let window: Vec<AnalyticsEvent> = {
            let events = self.events.lock().await;
            let skip = events.len().saturating_sub(limit);
            events.iter().skip(skip).cloned().collect()
        };
        compute_stats(&window)
    }
}

/// Pure aggregation over a window of events, oldest first.
pub fn compute_stats(window: &[AnalyticsEvent]) -> AnalyticsStats {
    let total_requests = window.len();
    let successful_requests = window.iter().filter(|e| e.success).count();
    let failed_requests = total_requests - successful_requests;
    let success_rate = if total_requests > 0 {
        successful_requests as f64 / total_requests as f64 * 100.0
    } else {
        0.0
    };

    let count_style = |style: Style| window.iter().filter(|e| e.style == Some(style)).count();
    let style_breakdown = StyleBreakdown {
        professional: count_style(Style::Professional),
        casual: count_style(Style::Casual),
        creative: count_style(Style::Creative),
    };

    let times: Vec<u64> = window
        .iter()
        .filter(|e| e.success)
        .filter_map(|e| e.generation_time_ms)
        .filter(|ms| *ms > 0)
        .collect();
    let average_generation_time = if times.is_empty() {
        0.0
    } else {
        times.iter().sum::<u64>() as f64 / times.len() as f64
    };

    let recent_start = window.len().saturating_sub(RECENT_EVENTS);

    AnalyticsStats {
        total_requests,
        successful_requests,
        failed_requests,
        success_rate,
        style_breakdown,
        average_generation_time,
        recent_events: window[recent_start..].to_vec(),
    }
}
