// All LLM prompt text for icebreaker generation.
// The profile text is embedded verbatim as data under INPUT_PROFILE; nothing is escaped.

use crate::models::icebreaker::{ProfileRequest, Style};

/// System/user message pair sent to every model in the fallback list.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const TASK: &str = "You are an assistant that writes concise, personal, 2-line outreach \
icebreakers for cold emails or LinkedIn DMs.

Goal

Given copied text from a person's LinkedIn profile (headline, about, experience, featured posts, \
skills), produce 3 alternative icebreakers tailored to them. Each icebreaker is 2 short lines:

Line 1 = personalised hook (specific detail you noticed)

Line 2 = value bridge (why I'm reaching out + relevant payoff)";

const PERSONALISATION_SIGNALS: &str = "Personalisation signals (use at least 2)

Recent role/company, product, industry focus

Metrics/achievements (growth %, ARR, awards)

Content themes from posts/newsletters

Tech stack or tools

Geography / market segment

Mutual interests or niche expertise";

const TONE_GUIDELINES: &str = "General Tone Guidelines

Australian spelling. No emojis. No fluff.

No generic compliments (\"great profile\"). Be specific.

No hard sell. No scheduling links. No \"quick call?\" asks.

Avoid spammy words: \"synergy, groundbreaking, disrupt, unparalleled\".";

const OUTPUT_RULES: &str = r#"Output rules

Return JSON only with this shape:
{
"icebreakers": [
{"line1": "…", "line2": "…"},
{"line1": "…", "line2": "…"},
{"line1": "…", "line2": "…"}
],
"notes": "1 sentence on the angle you chose"
}

Each line ≤ 18 words. No quotes. No bullets. No names unless necessary for clarity.

If profile text is too thin, infer from what's there and stay general but still useful."#;

/// Delimiter placed in front of the pasted profile in the user message.
pub const PROFILE_DELIMITER: &str = "INPUT_PROFILE:";

/// Tone instructions for one style preset.
pub fn style_instructions(style: Style) -> &'static str {
    match style {
        Style::Professional => {
            "Maintain a formal, business-focused tone. Use industry terminology appropriately. \
             Be respectful and polite. Focus on business value and professional achievements."
        }
        Style::Casual => {
            "Use a friendly, conversational tone. Be warm and approachable. Use contractions \
             and informal language where appropriate. Focus on shared interests and human connections."
        }
        Style::Creative => {
            "Be engaging and memorable. Use creative analogies or unexpected angles. Show \
             personality while remaining professional. Stand out from typical outreach messages."
        }
    }
}

/// Renders the fixed instruction template for a validated request. Pure and deterministic.
pub fn build_prompt(request: &ProfileRequest, sender_context: &str) -> Prompt {
    let style = request.style;
    let system = format!(
        "{TASK}\n\n{PERSONALISATION_SIGNALS}\n\n\
         Style Instructions for {} tone:\n{}\n\n\
         {TONE_GUIDELINES}\n\n{OUTPUT_RULES}\n\n\
         Context you can use about me (the sender)\n\n{}",
        style.as_str().to_uppercase(),
        style_instructions(style),
        sender_context.trim(),
    );

    Prompt {
        system,
        user: format!("{PROFILE_DELIMITER}\n{}", request.profile_text),
    }
}
