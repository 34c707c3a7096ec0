//! HTTP Handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;

use checkout_core::wire::{
    CreateOrderBatchRequest, CreateOrderBatchResponse, CreatePaymentMethodRequest,
    CreatePaymentMethodResponse, ErrorBody, PaymentMethodId,
};

use crate::goody::{CommerceApi, GoodyError};
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorBody>);

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub goody_configured: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        goody_configured: state.commerce.is_some(),
    })
}

/// Create a Goody payment method from an interim card key
pub async fn create_payment_method(
    State(state): State<AppState>,
    payload: Result<Json<CreatePaymentMethodRequest>, JsonRejection>,
) -> Result<Json<CreatePaymentMethodResponse>, ApiError> {
    let Json(payload) = payload.map_err(invalid_body)?;
    let commerce = commerce(&state)?;

    let created = commerce
        .create_payment_method(&payload)
        .await
        .map_err(|e| goody_error("create payment method", e))?;

    tracing::info!(payment_method_id = %created.id, "Payment method created");

    Ok(Json(CreatePaymentMethodResponse {
        message: format!("Payment method created: {}", created.id),
        payment_method_id: PaymentMethodId::from_string(created.id),
    }))
}

/// Create a demo Goody order batch paid with a stored payment method
pub async fn create_order_batch(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderBatchRequest>, JsonRejection>,
) -> Result<Json<CreateOrderBatchResponse>, ApiError> {
    let Json(payload) = payload.map_err(invalid_body)?;
    let commerce = commerce(&state)?;

    let created = commerce
        .create_order_batch(payload.payment_method_id.as_str())
        .await
        .map_err(|e| goody_error("create order batch", e))?;

    tracing::info!(order_batch_id = %created.id, "Order batch created");

    Ok(Json(CreateOrderBatchResponse {
        message: format!("Order batch created: {}", created.id),
        order_batch_id: Some(created.id),
        data: created.body,
    }))
}

fn commerce(state: &AppState) -> Result<&Arc<dyn CommerceApi>, ApiError> {
    state.commerce.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorBody::new("Payments not configured")),
        )
    })
}

/// Malformed request bodies still answer with `{error}`
fn invalid_body(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection, "Rejected request body");
    (rejection.status(), Json(ErrorBody::new(rejection.body_text())))
}

fn goody_error(operation: &str, err: GoodyError) -> ApiError {
    let status = match &err {
        GoodyError::Rejected(_) | GoodyError::UnexpectedStatus { .. } => StatusCode::BAD_REQUEST,
        GoodyError::Network(_) => StatusCode::BAD_GATEWAY,
        GoodyError::MissingId(_) | GoodyError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::BAD_REQUEST {
        tracing::warn!(operation, error = %err, "Goody rejected request");
    } else {
        tracing::error!(operation, error = %err, "Goody request failed");
    }

    (status, Json(ErrorBody::new(err.to_string())))
}
