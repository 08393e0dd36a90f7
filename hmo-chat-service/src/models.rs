use hmo_knowledge::{ChatMessage, Language, Phase, UserProfile};
use serde::{Deserialize, Serialize};

/// Chat endpoint request. Conversation state travels with every request;
/// the server keeps nothing between calls.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub user_info: UserProfile,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub updated_user_info: UserProfile,
    pub phase: Phase,
    pub is_complete: bool,
}
