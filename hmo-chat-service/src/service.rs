use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use hmo_knowledge::{KnowledgeStore, Role};
use rig::completion::{Chat, Message};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    chat::{TurnPlan, plan_turn},
    llm::get_llm_agent,
    models::{ChatRequest, ChatResponse},
};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

// Only the most recent turns are forwarded to the model.
const HISTORY_TURN_LIMIT: usize = 6;

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<KnowledgeStore>,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/chat", post(chat))
        .route("/knowledge", get(knowledge_summary))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "HMO Chat Service",
        "version": "1.0.0",
        "description": "Stateless two-phase chatbot for Israeli health fund services",
        "endpoints": {
            "POST /chat": "Handle one conversation turn",
            "GET /knowledge": "Loaded knowledge base summary",
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

async fn knowledge_summary(State(state): State<AppState>) -> Json<Value> {
    let categories: Vec<Value> = state
        .store
        .categories()
        .map(|category| {
            let services = state
                .store
                .get(category)
                .map_or(0, |doc| doc.services.len());
            json!({
                "category": category.key(),
                "services": services
            })
        })
        .collect();

    Json(json!({
        "categories": categories,
        "total": state.store.len()
    }))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<ChatResponse> {
    validate_message(&request.message)?;

    info!(
        phase = ?request.phase,
        history_len = request.conversation_history.len(),
        "handling chat turn"
    );

    match plan_turn(&request, &state.store) {
        TurnPlan::StaticAck(response) => Ok(Json(response)),
        TurnPlan::Llm {
            system_prompt,
            phase,
            profile,
        } => {
            let agent = get_llm_agent(&system_prompt).map_err(|e| {
                error!("Failed to build LLM agent: {}", e);
                internal_error("LLM configuration error", &e.to_string())
            })?;

            let history = build_history(&request);
            let response = agent.chat(&request.message, history).await.map_err(|e| {
                error!("LLM completion failed: {}", e);
                internal_error("Failed to generate response", &e.to_string())
            })?;

            Ok(Json(ChatResponse {
                response,
                updated_user_info: profile,
                phase,
                is_complete: false,
            }))
        }
    }
}

fn validate_message(message: &str) -> Result<(), ApiError> {
    if message.trim().is_empty() {
        return Err(bad_request_error("Message is required"));
    }
    Ok(())
}

/// Map the wire history onto rig messages. System entries never reach the
/// model; the system prompt is rebuilt from scratch each turn.
fn build_history(request: &ChatRequest) -> Vec<Message> {
    request
        .conversation_history
        .iter()
        .rev()
        .filter(|m| m.role != Role::System)
        .take(HISTORY_TURN_LIMIT)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .map(|m| match m.role {
            Role::Assistant => Message::assistant(m.content.clone()),
            _ => Message::user(m.content.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmo_knowledge::ChatMessage;

    #[test]
    fn history_keeps_most_recent_turns_in_order() {
        let mut request = ChatRequest {
            message: "שאלה".to_string(),
            user_info: Default::default(),
            conversation_history: Vec::new(),
            phase: Default::default(),
            language: Default::default(),
        };
        for i in 0..10 {
            request
                .conversation_history
                .push(ChatMessage::user(format!("turn {i}")));
        }

        let history = build_history(&request);
        assert_eq!(history.len(), HISTORY_TURN_LIMIT);
    }

    #[test]
    fn empty_message_is_rejected() {
        assert!(validate_message("   ").is_err());
        assert!(validate_message("שלום").is_ok());
    }
}
