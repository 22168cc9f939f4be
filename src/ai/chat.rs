//! Chat seeding and analysis summaries for the follow-up conversation.

use crate::analysis::UiAnalysisViewModel;
use crate::domain::HealthStatus;

/// Opening assistant message for a fresh analysis conversation.
pub fn initial_assistant_message(starter_name: &str, status: HealthStatus) -> String {
    match status {
        HealthStatus::Healthy => format!(
            "Great news! Your {} starter shows excellent signs of health. The bubble formation indicates active fermentation, and the rise pattern suggests it's ready for baking. What would you like to know about using it?",
            starter_name
        ),
        HealthStatus::Attention => format!(
            "Your {} starter shows moderate activity but could use some attention. I've analyzed the key indicators and can help you improve its health. What specific concerns do you have?",
            starter_name
        ),
        HealthStatus::Unhealthy => format!(
            "Your {} starter needs some care to restore its health. Based on the analysis, I can guide you through the steps to get it back to peak condition. What issues are you noticing?",
            starter_name
        ),
    }
}

/// One-line summary of an analysis for the chat system prompt.
pub fn analysis_chat_context(vm: &UiAnalysisViewModel) -> String {
    let mut parts = vec![
        format!("Health rating {}/5 ({})", vm.rating, vm.health_status.text),
        format!("stage: {}", vm.activity_stage.label),
        format!("rise score {}/10", vm.rise_score),
        format!("bubble score {}/10 ({})", vm.bubble_score, vm.bubble_pattern.pattern.as_str()),
        format!("confidence {}%", vm.confidence),
    ];
    if let Some(rec) = vm.recommendation.as_deref().filter(|r| !r.trim().is_empty()) {
        parts.push(format!("recommended next step: {}", rec.trim()));
    }
    parts.join("; ")
}
