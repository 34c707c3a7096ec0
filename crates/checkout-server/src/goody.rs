//! Goody Commerce API
//!
//! Upstream calls behind the two checkout endpoints. Goody answers 201 on
//! success and usually 400 with `{"error": ...}` on failure.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use checkout_core::wire::{BillingAddress, CreatePaymentMethodRequest};

use crate::config::GoodyConfig;

pub type Result<T> = std::result::Result<T, GoodyError>;

/// Goody API errors
#[derive(Error, Debug)]
pub enum GoodyError {
    /// Goody rejected the request (400) with this message
    #[error("{0}")]
    Rejected(String),

    /// Any other non-201 answer
    #[error("Got status code: {status} with body: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// 201 without an `id`
    #[error("No {0} ID returned from Goody API")]
    MissingId(&'static str),

    #[error("Goody API unreachable: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Object created by Goody: its id plus the full response body
#[derive(Clone, Debug, PartialEq)]
pub struct Created {
    pub id: String,
    pub body: Value,
}

/// Goody Commerce operations used by the checkout
#[async_trait]
pub trait CommerceApi: Send + Sync {
    async fn create_payment_method(&self, request: &CreatePaymentMethodRequest) -> Result<Created>;

    async fn create_order_batch(&self, payment_method_id: &str) -> Result<Created>;
}

/// `POST /v1/commerce_user_payment_methods` body
#[derive(Debug, Serialize)]
pub struct PaymentMethodPayload<'a> {
    pub interim_card_key: &'a str,
    pub cardholder_name: &'a str,
    pub billing_address: &'a BillingAddress,
    pub payment_method_type: &'static str,
    pub commerce_end_user_id: &'a str,
}

/// `POST /v1/order_batches` body
#[derive(Debug, Serialize)]
pub struct OrderBatchPayload<'a> {
    pub from_name: &'static str,
    pub message: &'static str,
    pub send_method: &'static str,
    pub commerce_end_user_id: &'a str,
    pub payment_method_id: &'a str,
    pub recipients: Vec<Recipient>,
    pub cart: Cart,
}

#[derive(Debug, Serialize)]
pub struct Recipient {
    pub first_name: String,
    pub last_name: String,
    pub mailing_address: BillingAddress,
}

#[derive(Debug, Serialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

#[derive(Debug, Serialize)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: u32,
}

impl<'a> OrderBatchPayload<'a> {
    /// Fixed demo order: one gift sent directly to a sample recipient
    pub fn demo(commerce_end_user_id: &'a str, payment_method_id: &'a str) -> Self {
        Self {
            from_name: "Monaco User",
            message: "Thanks!",
            send_method: "direct_send",
            commerce_end_user_id,
            payment_method_id,
            recipients: vec![Recipient {
                first_name: "Alena".into(),
                last_name: "Kenter".into(),
                mailing_address: BillingAddress {
                    address_1: "185 Berry St".into(),
                    address_2: String::new(),
                    city: "San Francisco".into(),
                    state: "CA".into(),
                    postal_code: "94107".into(),
                    country: "US".into(),
                },
            }],
            cart: Cart {
                items: vec![CartItem {
                    product_id: "bc25af6b-bf71-4da3-a8ef-5f873e03b7d4".into(),
                    quantity: 1,
                }],
            },
        }
    }
}

/// Goody Commerce REST client
pub struct GoodyClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    end_user_id: String,
}

impl GoodyClient {
    pub fn new(config: &GoodyConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| GoodyError::Config("GOODY_COMMERCE_API_KEY not set".into()))?;

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            end_user_id: config.end_user_id.clone(),
        })
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, entity: &'static str, body: &B) -> Result<Created> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        interpret(status, &text, entity)
    }
}

#[async_trait]
impl CommerceApi for GoodyClient {
    async fn create_payment_method(&self, request: &CreatePaymentMethodRequest) -> Result<Created> {
        let payload = PaymentMethodPayload {
            interim_card_key: request.interim_card_key.as_str(),
            cardholder_name: &request.cardholder_name,
            billing_address: &request.billing_address,
            payment_method_type: "card",
            commerce_end_user_id: &self.end_user_id,
        };
        self.post("/v1/commerce_user_payment_methods", "payment method", &payload)
            .await
    }

    async fn create_order_batch(&self, payment_method_id: &str) -> Result<Created> {
        let payload = OrderBatchPayload::demo(&self.end_user_id, payment_method_id);
        self.post("/v1/order_batches", "order batch", &payload).await
    }
}

/// Map a Goody response onto the created object or an error
pub fn interpret(status: StatusCode, body: &str, entity: &'static str) -> Result<Created> {
    match status {
        StatusCode::CREATED => {
            let body: Value = serde_json::from_str(body).map_err(|_| GoodyError::MissingId(entity))?;
            let id = body
                .get("id")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .ok_or(GoodyError::MissingId(entity))?
                .to_string();
            Ok(Created { id, body })
        }
        StatusCode::BAD_REQUEST => {
            let message = serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| "Unknown error".into());
            Err(GoodyError::Rejected(message))
        }
        other => Err(GoodyError::UnexpectedStatus {
            status: other.as_u16(),
            body: body.to_string(),
        }),
    }
}
