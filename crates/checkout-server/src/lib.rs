//! Checkout backend
//!
//! Axum server standing between the browser and the Goody Commerce API. It
//! holds the API key, so the browser only ever sees interim card keys and
//! payment method ids.

pub mod config;
pub mod goody;
pub mod handlers;
pub mod state;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use checkout_core::backend::{CREATE_ORDER_BATCH_PATH, CREATE_PAYMENT_METHOD_PATH};

use crate::config::ServerConfig;
use crate::handlers::{create_order_batch, create_payment_method, health_check};
use crate::state::AppState;

/// API routes without middleware or static files
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route(CREATE_PAYMENT_METHOD_PATH, post(create_payment_method))
        .route(CREATE_ORDER_BATCH_PATH, post(create_order_batch))
}

/// Full application: API, WASM frontend, CORS and request tracing
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let cors = match config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        Err(e) => {
            tracing::warn!(frontend_url = %config.frontend_url, "Invalid FRONTEND_URL, CORS disabled: {}", e);
            CorsLayer::new()
        }
    };

    api_router()
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
