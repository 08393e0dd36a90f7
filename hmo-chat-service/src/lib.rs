pub mod chat;
pub mod llm;
pub mod models;
pub mod prompts;
pub mod service;

pub use service::{AppState, build_router};
