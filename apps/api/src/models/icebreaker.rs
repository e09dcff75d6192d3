use std::fmt;

use serde::{Deserialize, Serialize};

/// Tone preset that parameterizes the prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Professional,
    Casual,
    Creative,
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Professional, Style::Casual, Style::Creative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Professional => "professional",
            Style::Casual => "casual",
            Style::Creative => "creative",
        }
    }

    /// Case-insensitive lookup; surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|s| s.as_str() == wanted)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw body of `POST /api/generate-icebreakers`, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateIcebreakersRequest {
    #[serde(default)]
    pub profile_text: String,
    #[serde(default)]
    pub style: Option<String>,
}

/// A validated request. Only the input validator constructs these.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRequest {
    pub profile_text: String,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcebreakerSuggestion {
    pub line1: String,
    pub line2: String,
}

pub const DEFAULT_NOTES: &str = "Generated personalized icebreakers based on profile analysis";

/// Three suggestions plus the model's one-sentence note on the chosen angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub icebreakers: Vec<IcebreakerSuggestion>,
    #[serde(default)]
    pub notes: String,
}

impl GenerationResult {
    /// Replaces a blank `notes` with the stock sentence.
    pub fn with_default_notes(mut self) -> Self {
        if self.notes.trim().is_empty() {
            self.notes = DEFAULT_NOTES.to_string();
        }
        self
    }
}
