//! Checkout HTTP Server

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_server::{config::ServerConfig, goody::GoodyClient, router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    // Initialize Goody client
    let state = match GoodyClient::new(&config.goody) {
        Ok(client) => {
            tracing::info!(base_url = %config.goody.base_url, "✓ Goody Commerce configured");
            AppState::new(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!("⚠ Goody Commerce not configured - payments disabled: {}", e);
            tracing::warn!("  Set GOODY_COMMERCE_API_KEY in .env");
            AppState::default()
        }
    };

    let app = router(state, &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 checkout server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                      - Health check");
    tracing::info!("  POST /create_goody_payment_method - Store card as payment method");
    tracing::info!("  POST /create_goody_order_batch    - Create demo order batch");
    tracing::info!("  CORS origin: {}", config.frontend_url);
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
