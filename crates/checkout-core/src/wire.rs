//! Wire Types
//!
//! JSON bodies exchanged between the browser and the checkout backend.

use serde::{Deserialize, Serialize};

/// Opaque one-time reference to vaulted card data
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterimCardToken(String);

impl InterimCardToken {
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InterimCardToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend-issued payment method identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethodId(String);

impl PaymentMethodId {
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentMethodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Billing address as the backend expects it
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
    pub address_1: String,
    #[serde(default)]
    pub address_2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// `POST /create_goody_payment_method` request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentMethodRequest {
    pub interim_card_key: InterimCardToken,
    pub cardholder_name: String,
    pub billing_address: BillingAddress,
}

/// `POST /create_goody_payment_method` success response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentMethodResponse {
    pub message: String,
    pub payment_method_id: PaymentMethodId,
}

/// `POST /create_goody_order_batch` request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderBatchRequest {
    pub payment_method_id: PaymentMethodId,
}

/// `POST /create_goody_order_batch` success response
///
/// `data` is the upstream order batch, passed through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderBatchResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_batch_id: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Body of every non-success backend response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_method_request_shape() {
        let request = CreatePaymentMethodRequest {
            interim_card_key: InterimCardToken::from_string("tok_123"),
            cardholder_name: "John Cena".into(),
            billing_address: BillingAddress {
                address_1: "185 Berry St".into(),
                address_2: String::new(),
                city: "San Francisco".into(),
                state: "CA".into(),
                postal_code: "94107".into(),
                country: "US".into(),
            },
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "interim_card_key": "tok_123",
                "cardholder_name": "John Cena",
                "billing_address": {
                    "address_1": "185 Berry St",
                    "address_2": "",
                    "city": "San Francisco",
                    "state": "CA",
                    "postal_code": "94107",
                    "country": "US"
                }
            })
        );
    }

    #[test]
    fn test_order_batch_response_without_id() {
        let parsed: CreateOrderBatchResponse = serde_json::from_value(json!({
            "message": "Order batch created: ob_1",
            "data": {"id": "ob_1", "orders": []}
        }))
        .unwrap();

        assert_eq!(parsed.order_batch_id, None);
        assert_eq!(parsed.data, json!({"id": "ob_1", "orders": []}));
    }
}
