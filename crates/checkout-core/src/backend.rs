//! Payment Backend Client
//!
//! Calls the checkout backend and folds every failure into a
//! [`CheckoutError`] whose display string is what the user sees.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{CheckoutError, Operation, Result};
use crate::wire::{
    CreateOrderBatchRequest, CreateOrderBatchResponse, CreatePaymentMethodRequest,
    CreatePaymentMethodResponse, ErrorBody, PaymentMethodId,
};

pub const CREATE_PAYMENT_METHOD_PATH: &str = "/create_goody_payment_method";
pub const CREATE_ORDER_BATCH_PATH: &str = "/create_goody_order_batch";

/// Default backend origin for local development
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000";

/// Checkout backend operations
#[async_trait(?Send)]
pub trait PaymentBackend {
    /// Exchange an interim card token and billing address for a payment method
    async fn create_payment_method(
        &self,
        request: &CreatePaymentMethodRequest,
    ) -> Result<CreatePaymentMethodResponse>;

    /// Create an order batch charged to a stored payment method
    async fn create_order_batch(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<CreateOrderBatchResponse>;
}

/// `PaymentBackend` over HTTP
#[derive(Clone, Debug)]
pub struct HttpPaymentBackend {
    client: reqwest::Client,
    base_url: String,
}

impl Default for HttpPaymentBackend {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl HttpPaymentBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(&self, operation: Operation, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let transport = |e: reqwest::Error| CheckoutError::BackendTransport {
            operation,
            message: e.to_string(),
        };

        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let err = http_failure(status.as_u16(), &body);
            tracing::warn!(%status, %operation, error = %err, "Backend request failed");
            return Err(err);
        }

        response.json::<T>().await.map_err(transport)
    }
}

#[async_trait(?Send)]
impl PaymentBackend for HttpPaymentBackend {
    async fn create_payment_method(
        &self,
        request: &CreatePaymentMethodRequest,
    ) -> Result<CreatePaymentMethodResponse> {
        self.post(Operation::CreatePaymentMethod, CREATE_PAYMENT_METHOD_PATH, request)
            .await
    }

    async fn create_order_batch(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<CreateOrderBatchResponse> {
        let request = CreateOrderBatchRequest {
            payment_method_id: payment_method_id.clone(),
        };
        self.post(Operation::CreateOrderBatch, CREATE_ORDER_BATCH_PATH, &request)
            .await
    }
}

/// Interpret a non-success response body.
///
/// A JSON body with a non-empty `error` supplies the message; anything else
/// falls back to the status line.
pub fn http_failure(status: u16, body: &[u8]) -> CheckoutError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|e| !e.is_empty());

    CheckoutError::BackendHttp { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_message() {
        let err = http_failure(400, br#"{"error":"bad token"}"#);
        assert_eq!(err.to_string(), "bad token");
    }

    #[test]
    fn test_unparseable_body() {
        let err = http_failure(500, b"<html>Internal Server Error</html>");
        assert_eq!(err.to_string(), "HTTP error! Status: 500");
    }

    #[test]
    fn test_json_without_error_field() {
        let err = http_failure(500, br#"{"detail":"No payment method ID returned"}"#);
        assert_eq!(err.to_string(), "HTTP error! Status: 500");

        let err = http_failure(400, br#"{"error":""}"#);
        assert_eq!(err.to_string(), "HTTP error! Status: 400");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let backend = HttpPaymentBackend::new("http://localhost:4000/");
        assert_eq!(backend.base_url(), "http://localhost:4000");
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Port 9 (discard) on loopback is expected to refuse connections
        let backend = HttpPaymentBackend::new("http://127.0.0.1:9");
        let err = backend
            .create_order_batch(&PaymentMethodId::from_string("pm_1"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::BackendTransport { operation: Operation::CreateOrderBatch, .. }
        ));
        assert!(err.to_string().starts_with("Failed to create order batch: "));
    }
}
