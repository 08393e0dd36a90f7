use std::sync::Arc;

use form_extraction_service::{AppState, build_router, ocr::OcrClient};
use tokio::net::TcpListener;
use tracing::{Level, info};
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

    let ocr = OcrClient::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8001".to_string())
        .parse::<u16>()
        .unwrap_or(8001);

    let app = build_router(AppState { ocr: Arc::new(ocr) });
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    let addr = listener.local_addr()?;

    info!("Form Extraction Service starting on {}", addr);
    info!("Health check endpoint: http://{}/health", addr);
    info!("Extraction endpoint: POST http://{}/extract", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
