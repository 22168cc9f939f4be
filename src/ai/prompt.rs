//! Prompt text for the diagnostic (image) and chat calls.

use crate::domain::AnalysisContext;

/// Goal keys the capture screen offers, with the phrasing the model sees.
static GOAL_LABELS: &[(&str, &str)] = &[
    ("baking", "Bake this weekend"),
    ("maintenance", "Regular maintenance"),
    ("troubleshoot", "Troubleshoot issues"),
    ("revive", "Revive dormant starter"),
];

/// Readable goal; unknown goals pass through verbatim.
pub fn goal_label(goal: &str) -> &str {
    GOAL_LABELS
        .iter()
        .find(|(key, _)| *key == goal)
        .map(|(_, label)| *label)
        .unwrap_or(goal)
}

/// Fahrenheit to whole Celsius, rounding halves up.
pub fn fahrenheit_to_celsius_rounded(temp_f: f64) -> i64 {
    ((temp_f - 32.0) * 5.0 / 9.0 + 0.5).floor() as i64
}

/// "24°C (75°F)"
pub fn format_room_temp(temp_f: f64) -> String {
    format!("{}°C ({}°F)", fahrenheit_to_celsius_rounded(temp_f), temp_f)
}

const PERSONA: &str = "You are \"Starter-Sensei,\" a master sourdough coach with 20 years of hands-on baking and fermentation troubleshooting.";

const DIAGNOSTIC_TASK: &str = r#"**Task**: Diagnose the health and stage of a sourdough starter from ONE photo and the context provided. Then give specific next-step instructions. **Look out for any pink or orange tint/streak. This is a sure sign the starter has gone bad and must be discarded.**

**Instructions**
1. Inspect the photo for: rise height (relative to jar markings), bubble size & density, surface texture, color layers, presence of hooch, and sidewall residue.
2. Combine that with the context (time since last feed, feed ratio, flour type, current room temp).
3. Determine the starter's current fermentation stage (lag, early growth, peak, late decline).
4. Rate overall health on a 1-5 scale (5 = vibrant, 1 = needs rescue).
5. Recommend the *single best* next step (e.g., feed ratio, temperature adjustment, discard amount) to keep it on track for baking within 12–24 h.
6. Provide a confidence score (0-100 %) and a one-sentence rationale."#;

const RESPONSE_FORMAT: &str = r#"Respond in this JSON format so it's easy to parse:
{
  "rise_height": "detailed description of rise activity",
  "rise_height_score": "numeric score 1-10",
  "bubble_density": "detailed description of bubble formation",
  "bubble_density_score": "numeric score 1-10",
  "surface_texture": "detailed surface analysis",
  "color_notes": "specific color descriptions (e.g. light-cream, beige, gray-white)",
  "activity_stage": "one of: lag, early-growth, peak, late-decline, dormant",
  "health_rating": "numeric rating 1-5",
  "recommended_next_step": "specific actionable recommendation",
  "confidence_pct": "confidence percentage 0-100",
  "rationale": "one sentence explanation of assessment"
}"#;

/// Full prompt sent with the starter photo.
pub fn diagnostic_prompt(ctx: &AnalysisContext) -> String {
    format!(
        "{persona}\n\n{task}\n\n**Context**\n\
         – Time since last feed: {time}\n\
         – Last feed ratio & flour: {ratio} ({flour})\n\
         – Current room temp: {temp}\n\
         – Goal: {goal}\n\n{format}",
        persona = PERSONA,
        task = DIAGNOSTIC_TASK,
        time = ctx.time_since_feed,
        ratio = ctx.last_feed_ratio,
        flour = ctx.flour_type,
        temp = format_room_temp(ctx.room_temp_f),
        goal = goal_label(&ctx.goal),
        format = RESPONSE_FORMAT,
    )
}

/// System prompt for follow-up chat, optionally grounded in a prior analysis.
pub fn chat_system_prompt(context: Option<&str>) -> String {
    let context_line = match context.map(str::trim) {
        Some(ctx) if !ctx.is_empty() => format!("Context from recent analysis: {}", ctx),
        _ => String::new(),
    };

    format!(
        "{} You help users with questions about their sourdough starters, providing practical, actionable advice based on your expertise.\n\n\
         {}\n\n\
         Keep your responses helpful, conversational, and focused on practical sourdough guidance.",
        PERSONA, context_line
    )
}
