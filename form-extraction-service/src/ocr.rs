//! Azure Document Intelligence client.
//!
//! Submits the document to the prebuilt-layout model and polls the returned
//! operation until the analysis succeeds. Polling is bounded; running out of
//! attempts is a retryable failure for the caller.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::{ExtractionError, Result};

const API_VERSION: &str = "2024-11-30";
const MODEL_ID: &str = "prebuilt-layout";
const DEFAULT_LOCALE: &str = "he";
const POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLL_ATTEMPTS: u32 = 30;

pub struct OcrClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OcrClient {
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("AZURE_DOCUMENT_INTELLIGENCE_ENDPOINT")
            .map_err(|_| ExtractionError::MissingConfig("AZURE_DOCUMENT_INTELLIGENCE_ENDPOINT"))?;
        let api_key = std::env::var("AZURE_DOCUMENT_INTELLIGENCE_KEY")
            .map_err(|_| ExtractionError::MissingConfig("AZURE_DOCUMENT_INTELLIGENCE_KEY"))?;

        Ok(Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Run layout analysis on the document and return the raw text content.
    pub async fn extract_text(&self, document: &[u8], locale: Option<&str>) -> Result<String> {
        let locale = locale.unwrap_or(DEFAULT_LOCALE);
        let url = format!(
            "{}/documentintelligence/documentModels/{}:analyze\
             ?api-version={}&locale={}&features=ocrHighResolution,languages",
            self.endpoint, MODEL_ID, API_VERSION, locale
        );

        info!(bytes = document.len(), locale, "submitting document for OCR");

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(&json!({ "base64Source": STANDARD.encode(document) }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::OcrRejected(format!("{status}: {body}")));
        }

        let operation_url = response
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                ExtractionError::OcrRejected("missing Operation-Location header".to_string())
            })?;

        self.poll_result(&operation_url).await
    }

    async fn poll_result(&self, operation_url: &str) -> Result<String> {
        for attempt in 1..=MAX_POLL_ATTEMPTS {
            tokio::time::sleep(POLL_INTERVAL).await;

            let result: Value = self
                .client
                .get(operation_url)
                .header("Ocp-Apim-Subscription-Key", &self.api_key)
                .send()
                .await?
                .json()
                .await?;

            match result["status"].as_str() {
                Some("succeeded") => {
                    let content = result["analyzeResult"]["content"]
                        .as_str()
                        .unwrap_or_default();
                    if content.trim().is_empty() {
                        return Err(ExtractionError::EmptyOcrText);
                    }
                    info!(chars = content.len(), "OCR analysis succeeded");
                    return Ok(content.to_string());
                }
                Some("failed") => {
                    return Err(ExtractionError::OcrRejected(
                        result["error"]["message"]
                            .as_str()
                            .unwrap_or("analysis failed")
                            .to_string(),
                    ));
                }
                status => {
                    warn!(attempt, ?status, "OCR analysis still running");
                }
            }
        }

        Err(ExtractionError::OcrTimeout {
            attempts: MAX_POLL_ATTEMPTS,
        })
    }
}
