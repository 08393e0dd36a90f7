use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    cleanup::clean_document_text,
    error::ExtractionError,
    extract::extract_fields,
    models::{ExtractRequest, ExtractResponse},
    ocr::OcrClient,
};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn extraction_error(e: ExtractionError) -> ApiError {
    error!("Extraction failed: {}", e);
    (
        e.status_code(),
        Json(json!({
            "error": "Extraction failed",
            "details": e.to_string(),
            "retryable": e.is_retryable()
        })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub ocr: Arc<OcrClient>,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/extract", post(extract_document))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Form Extraction Service",
        "version": "1.0.0",
        "description": "OCR and field extraction for National Insurance Institute forms",
        "endpoints": {
            "POST /extract": "Extract form fields from a base64 PDF",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn extract_document(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> ApiResult<ExtractResponse> {
    if request.document.trim().is_empty() {
        return Err(bad_request_error("Document is required"));
    }

    let extraction_id = Uuid::new_v4();
    info!(%extraction_id, "starting form extraction");

    let document = STANDARD
        .decode(request.document.trim())
        .map_err(|e| extraction_error(ExtractionError::InvalidDocument(e)))?;

    let raw_text = state
        .ocr
        .extract_text(&document, request.language.as_deref())
        .await
        .map_err(extraction_error)?;

    let cleaned_text = clean_document_text(&raw_text);
    info!(
        %extraction_id,
        raw_chars = raw_text.len(),
        cleaned_chars = cleaned_text.len(),
        "OCR text cleaned"
    );

    let fields = extract_fields(&cleaned_text)
        .await
        .map_err(extraction_error)?;

    info!(%extraction_id, "form extraction completed");
    Ok(Json(ExtractResponse {
        extraction_id,
        fields,
        ocr_text_chars: cleaned_text.chars().count(),
    }))
}
