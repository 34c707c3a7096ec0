//! Checkout Flow
//!
//! The two user-gated round trips. Each function performs the side effects of
//! one stage and returns the event that completes it; the caller applies the
//! matching start event first.

use crate::backend::PaymentBackend;
use crate::error::CheckoutError;
use crate::form::BillingFormValues;
use crate::state::CheckoutEvent;
use crate::tokenize::CardTokenizer;
use crate::wire::{CreatePaymentMethodRequest, PaymentMethodId};

/// Tokenize the secure fields and create a payment method from the token.
pub async fn submit_card<T, B>(tokenizer: &T, backend: &B, form: &BillingFormValues) -> CheckoutEvent
where
    T: CardTokenizer + ?Sized,
    B: PaymentBackend + ?Sized,
{
    let missing = form.missing_required();
    if !missing.is_empty() {
        let labels = missing.into_iter().map(|f| f.label()).collect();
        return CheckoutEvent::CardRejected(CheckoutError::MissingBillingFields(labels).to_string());
    }

    let token = match tokenizer.interim_card_token().await {
        Ok(token) => token,
        Err(e) => {
            if e.is_user_correctable() {
                tracing::info!(error = %e, "Card details rejected");
            } else {
                tracing::warn!(error = %e, "Tokenization failed");
            }
            return CheckoutEvent::CardRejected(e.to_string());
        }
    };

    let request = CreatePaymentMethodRequest {
        interim_card_key: token,
        cardholder_name: form.cardholder_name.clone(),
        billing_address: form.billing_address(),
    };

    match backend.create_payment_method(&request).await {
        Ok(created) => {
            tracing::info!(payment_method_id = %created.payment_method_id, "Payment method created");
            CheckoutEvent::PaymentMethodCreated {
                message: created.message,
                payment_method_id: created.payment_method_id,
            }
        }
        Err(e) => CheckoutEvent::PaymentMethodFailed(e.to_string()),
    }
}

/// Create an order batch for a stored payment method.
pub async fn submit_order_batch<B>(backend: &B, payment_method_id: &PaymentMethodId) -> CheckoutEvent
where
    B: PaymentBackend + ?Sized,
{
    match backend.create_order_batch(payment_method_id).await {
        Ok(batch) => CheckoutEvent::OrderBatchCreated {
            message: batch.message,
            data: batch.data,
        },
        Err(e) => CheckoutEvent::OrderBatchFailed(e.to_string()),
    }
}
