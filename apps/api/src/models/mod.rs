pub mod analytics;
pub mod icebreaker;
