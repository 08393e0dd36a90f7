//! LLM field extraction from cleaned OCR text.

use reqwest::Client;
use serde_json::{Value, json};
use tracing::info;

use crate::error::{ExtractionError, Result};
use crate::models::ExtractedFields;
use crate::prompts::EXTRACTION_PROMPT;

const EXTRACTION_MODEL: &str = "openai/gpt-4o";
const MAX_COMPLETION_TOKENS: u32 = 2000;
const TEMPERATURE: f64 = 0.1;

pub async fn extract_fields(ocr_text: &str) -> Result<ExtractedFields> {
    let prompt = format!("{EXTRACTION_PROMPT}{ocr_text}");
    let content = call_openrouter_api(EXTRACTION_MODEL, &prompt, MAX_COMPLETION_TOKENS).await?;

    info!(chars = content.len(), "received extraction completion");
    parse_completion(&content)
}

/// Scan the completion for the outermost JSON object and parse it. The
/// model sometimes wraps the object in prose or a code fence.
pub fn parse_completion(content: &str) -> Result<ExtractedFields> {
    let start = content.find('{');
    let end = content.rfind('}');

    match (start, end) {
        (Some(start), Some(end)) if start < end => {
            let fields = serde_json::from_str(&content[start..=end])?;
            Ok(fields)
        }
        _ => Err(ExtractionError::NoJsonInCompletion),
    }
}

async fn call_openrouter_api(model: &str, prompt: &str, max_tokens: u32) -> Result<String> {
    let api_key = std::env::var("OPENROUTER_API_KEY")
        .map_err(|_| ExtractionError::MissingConfig("OPENROUTER_API_KEY"))?;

    let client = Client::new();

    let payload = json!({
        "model": model,
        "messages": [
            {
                "role": "user",
                "content": prompt
            }
        ],
        "temperature": TEMPERATURE,
        "max_tokens": max_tokens
    });

    let response = client
        .post("https://openrouter.ai/api/v1/chat/completions")
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ExtractionError::LlmRequest(format!(
            "LLM API request failed: {}",
            response.status()
        )));
    }

    let response_json: Value = response.json().await?;

    let content = response_json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| {
            ExtractionError::LlmRequest("invalid response format from LLM".to_string())
        })?;

    Ok(content.trim().to_string())
}
