//! Chat-completion request bodies and response decoding.

use serde_json::{json, Value};

use crate::analysis::RawAiAnalysis;
use crate::errors::{AiError, AiResult};

pub const ANALYSIS_MAX_COMPLETION_TOKENS: u32 = 1000;
pub const CHAT_MAX_COMPLETION_TOKENS: u32 = 500;
pub const CHAT_TEMPERATURE: f64 = 0.7;

/// Image request: one user message with the prompt and a JPEG data URI.
///
/// No `temperature`; reasoning models only accept the default.
pub fn analysis_request_body(model: &str, prompt: &str, image_base64: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            {
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    {
                        "type": "image_url",
                        "image_url": {
                            "url": format!("data:image/jpeg;base64,{}", image_base64),
                            "detail": "high"
                        }
                    }
                ]
            }
        ],
        "max_completion_tokens": ANALYSIS_MAX_COMPLETION_TOKENS
    })
}

pub fn chat_request_body(model: &str, system_prompt: &str, message: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": system_prompt },
            { "role": "user", "content": message }
        ],
        "max_completion_tokens": CHAT_MAX_COMPLETION_TOKENS,
        "temperature": CHAT_TEMPERATURE
    })
}

/// `choices[0].message.content` of a completion response.
pub fn chat_completion_content(body: &Value) -> AiResult<&str> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .filter(|content| !content.is_empty())
        .ok_or(AiError::EmptyContent)
}

/// Span from the first `{` to the last `}`, tolerating prose around the JSON.
pub fn extract_json_object(content: &str) -> AiResult<&str> {
    let start = content.find('{').ok_or(AiError::NoJson)?;
    let end = content.rfind('}').ok_or(AiError::NoJson)?;
    if end < start {
        return Err(AiError::NoJson);
    }
    Ok(&content[start..=end])
}

/// Decode the model's reply into a raw analysis.
pub fn parse_analysis_content(content: &str) -> AiResult<RawAiAnalysis> {
    let value: Value = serde_json::from_str(extract_json_object(content)?)?;
    if !value.is_object() {
        return Err(AiError::NoJson);
    }
    Ok(RawAiAnalysis::from_value(&value))
}
