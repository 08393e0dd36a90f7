pub mod cleanup;
pub mod error;
pub mod extract;
pub mod models;
pub mod ocr;
pub mod prompts;
pub mod service;

pub use service::{AppState, build_router};
