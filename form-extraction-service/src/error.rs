use axum::http::StatusCode;
use thiserror::Error;

/// Failures of one extraction call. Every variant fails the whole call;
/// `is_retryable` tells the client whether resubmitting the same document
/// can help.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("document is not valid base64: {0}")]
    InvalidDocument(#[from] base64::DecodeError),

    #[error("OCR request failed: {0}")]
    OcrRequest(#[from] reqwest::Error),

    #[error("OCR service rejected the document: {0}")]
    OcrRejected(String),

    #[error("OCR analysis did not finish after {attempts} polls")]
    OcrTimeout { attempts: u32 },

    #[error("OCR returned no text content")]
    EmptyOcrText,

    #[error("LLM API request failed: {0}")]
    LlmRequest(String),

    #[error("no JSON object found in model output")]
    NoJsonInCompletion,

    #[error("model output is not the expected schema: {0}")]
    InvalidSchema(#[from] serde_json::Error),

    #[error("{0} environment variable not set")]
    MissingConfig(&'static str),
}

impl ExtractionError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExtractionError::OcrRequest(_)
                | ExtractionError::OcrTimeout { .. }
                | ExtractionError::LlmRequest(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ExtractionError::InvalidDocument(_) => StatusCode::BAD_REQUEST,
            ExtractionError::OcrTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ExtractionError::OcrRequest(_)
            | ExtractionError::OcrRejected(_)
            | ExtractionError::LlmRequest(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
