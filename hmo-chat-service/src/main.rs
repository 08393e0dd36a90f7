use std::sync::Arc;

use hmo_chat_service::{AppState, build_router};
use hmo_knowledge::KnowledgeStore;
use tokio::net::TcpListener;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Check required environment variables
    if std::env::var("OPENROUTER_API_KEY").is_err() {
        eprintln!("Error: OPENROUTER_API_KEY environment variable is required");
        std::process::exit(1);
    }

    let data_dir = std::env::var("KNOWLEDGE_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let store = KnowledgeStore::load_from_dir(&data_dir)?;
    if store.is_empty() {
        warn!("No knowledge documents loaded from {}", data_dir);
    } else {
        info!("Loaded {} knowledge documents from {}", store.len(), data_dir);
    }

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse::<u16>()
        .unwrap_or(8000);

    let app = build_router(AppState {
        store: Arc::new(store),
    });
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    let addr = listener.local_addr()?;

    info!("HMO Chat Service starting on {}", addr);
    info!("Health check endpoint: http://{}/health", addr);
    info!("Chat endpoint: POST http://{}/chat", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
