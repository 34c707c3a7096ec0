//! End-to-end checkout flow against in-memory collaborators.

use std::cell::RefCell;

use async_trait::async_trait;
use checkout_core::{
    BillingFormValues, CardTokenizer, CheckoutError, CheckoutEvent, CheckoutState, FormField,
    InterimCardToken, Operation, PaymentBackend, PaymentMethodId, Result, flow,
    wire::{BillingAddress, CreateOrderBatchResponse, CreatePaymentMethodRequest, CreatePaymentMethodResponse},
};
use serde_json::{Value, json};

struct StubTokenizer(std::result::Result<&'static str, &'static str>);

#[async_trait(?Send)]
impl CardTokenizer for StubTokenizer {
    async fn interim_card_token(&self) -> Result<InterimCardToken> {
        self.0
            .map(InterimCardToken::from_string)
            .map_err(|m| CheckoutError::FieldValidation(m.into()))
    }
}

#[derive(Default)]
struct RecordingBackend {
    payment_requests: RefCell<Vec<CreatePaymentMethodRequest>>,
    batch_requests: RefCell<Vec<PaymentMethodId>>,
    batch_data: Value,
    fail_with: Option<u16>,
}

#[async_trait(?Send)]
impl PaymentBackend for RecordingBackend {
    async fn create_payment_method(
        &self,
        request: &CreatePaymentMethodRequest,
    ) -> Result<CreatePaymentMethodResponse> {
        self.payment_requests.borrow_mut().push(request.clone());
        if let Some(status) = self.fail_with {
            return Err(CheckoutError::BackendHttp { status, message: Some("bad token".into()) });
        }
        Ok(CreatePaymentMethodResponse {
            message: "Payment method created: pm_42".into(),
            payment_method_id: PaymentMethodId::from_string("pm_42"),
        })
    }

    async fn create_order_batch(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<CreateOrderBatchResponse> {
        self.batch_requests.borrow_mut().push(payment_method_id.clone());
        if self.fail_with.is_some() {
            return Err(CheckoutError::BackendTransport {
                operation: Operation::CreateOrderBatch,
                message: "connection reset".into(),
            });
        }
        Ok(CreateOrderBatchResponse {
            message: "Order batch created: ob_7".into(),
            order_batch_id: Some("ob_7".into()),
            data: self.batch_data.clone(),
        })
    }
}

#[tokio::test]
async fn card_submission_reveals_order_batch_action() {
    let tokenizer = StubTokenizer(Ok("tok_123"));
    let backend = RecordingBackend::default();

    let state = CheckoutState::new(BillingFormValues::demo()).apply(CheckoutEvent::CardSubmitStarted);
    assert!(!state.shows_order_batch_action());

    let outcome = flow::submit_card(&tokenizer, &backend, &state.form).await;
    let state = state.apply(outcome);

    let requests = backend.payment_requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].interim_card_key.as_str(), "tok_123");
    assert_eq!(requests[0].cardholder_name, "John Cena");
    assert_eq!(
        requests[0].billing_address,
        BillingAddress {
            address_1: "185 Berry St".into(),
            address_2: String::new(),
            city: "San Francisco".into(),
            state: "CA".into(),
            postal_code: "94107".into(),
            country: "US".into(),
        }
    );

    assert!(!state.card_submitting);
    assert_eq!(state.card_message.as_deref(), Some("Payment method created: pm_42"));
    assert!(state.shows_order_batch_action());
    assert!(state.can_submit_batch());
}

#[tokio::test]
async fn order_batch_data_is_displayed_verbatim() {
    let data = json!({
        "id": "ob_7",
        "send_status": "complete",
        "orders": [{"id": "o_1", "amounts": {"total": 2500}}],
        "recipients": [{"first_name": "Alena", "last_name": "Kenter"}]
    });
    let backend = RecordingBackend {
        batch_data: data.clone(),
        ..Default::default()
    };

    let state = CheckoutState::default().apply(CheckoutEvent::PaymentMethodCreated {
        message: "Payment method created: pm_42".into(),
        payment_method_id: PaymentMethodId::from_string("pm_42"),
    });
    let state = state.apply(CheckoutEvent::BatchSubmitStarted);
    let id = state.payment_method_id.clone().unwrap();

    let state = state.apply(flow::submit_order_batch(&backend, &id).await);

    assert_eq!(backend.batch_requests.borrow().as_slice(), [PaymentMethodId::from_string("pm_42")]);
    assert_eq!(state.batch_message.as_deref(), Some("Order batch created: ob_7"));
    assert_eq!(state.batch_data, Some(data));
}

#[tokio::test]
async fn validation_errors_never_reach_backend() {
    let tokenizer = StubTokenizer(Err("CVC invalid"));
    let backend = RecordingBackend::default();

    let state = CheckoutState::new(BillingFormValues::demo()).apply(CheckoutEvent::CardSubmitStarted);
    let state = state.apply(flow::submit_card(&tokenizer, &backend, &BillingFormValues::demo()).await);

    assert!(backend.payment_requests.borrow().is_empty());
    assert_eq!(state.card_error.as_deref(), Some("CVC invalid"));
    assert!(state.can_submit_card());
    assert!(!state.shows_order_batch_action());
}

#[tokio::test]
async fn blank_billing_fields_are_reported() {
    let tokenizer = StubTokenizer(Ok("tok_123"));
    let backend = RecordingBackend::default();
    let form = BillingFormValues::demo()
        .with_field(FormField::City, "")
        .with_field(FormField::PostalCode, " ");

    let outcome = flow::submit_card(&tokenizer, &backend, &form).await;

    assert_eq!(
        outcome,
        CheckoutEvent::CardRejected("Please fill in: City, Postal Code".into())
    );
    assert!(backend.payment_requests.borrow().is_empty());
}

#[tokio::test]
async fn backend_failures_surface_as_messages() {
    let tokenizer = StubTokenizer(Ok("tok_123"));
    let backend = RecordingBackend {
        fail_with: Some(400),
        ..Default::default()
    };

    let outcome = flow::submit_card(&tokenizer, &backend, &BillingFormValues::demo()).await;
    assert_eq!(outcome, CheckoutEvent::PaymentMethodFailed("bad token".into()));

    let outcome = flow::submit_order_batch(&backend, &PaymentMethodId::from_string("pm_1")).await;
    assert_eq!(
        outcome,
        CheckoutEvent::OrderBatchFailed("Failed to create order batch: connection reset".into())
    );
}
