//! Checkout State
//!
//! Everything the page shows is derived from [`CheckoutState`]. State only
//! changes through [`CheckoutState::apply`], which takes the prior state and an
//! event and returns the next state.

use serde_json::Value;

use crate::form::{BillingFormValues, FormField};
use crate::wire::PaymentMethodId;

/// Events that drive the checkout page
#[derive(Clone, Debug, PartialEq)]
pub enum CheckoutEvent {
    /// User edited a billing field
    FieldChanged { field: FormField, value: String },

    /// Secure fields could not be set up and never will be on this page
    TokenizerFailed(String),

    /// Card form submitted
    CardSubmitStarted,

    /// Tokenization or form validation failed before reaching the backend
    CardRejected(String),

    PaymentMethodCreated {
        message: String,
        payment_method_id: PaymentMethodId,
    },

    PaymentMethodFailed(String),

    /// Order batch requested for the current payment method
    BatchSubmitStarted,

    OrderBatchCreated { message: String, data: Value },

    OrderBatchFailed(String),
}

/// Page state for one session
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CheckoutState {
    pub form: BillingFormValues,

    /// Secure field setup failed; the card form stays disabled
    pub setup_failed: bool,

    /// Card submission in flight
    pub card_submitting: bool,

    /// Inline error under the secure fields
    pub card_error: Option<String>,

    /// Outcome of the payment method call
    pub card_message: Option<String>,

    pub payment_method_id: Option<PaymentMethodId>,

    /// Order batch submission in flight
    pub batch_submitting: bool,

    pub batch_message: Option<String>,

    /// Order batch payload as returned by the backend
    pub batch_data: Option<Value>,
}

impl CheckoutState {
    pub fn new(form: BillingFormValues) -> Self {
        Self {
            form,
            ..Default::default()
        }
    }

    pub const fn can_submit_card(&self) -> bool {
        !self.card_submitting && !self.setup_failed
    }

    pub const fn can_submit_batch(&self) -> bool {
        !self.batch_submitting && self.payment_method_id.is_some()
    }

    /// The follow-up order batch action is revealed once a payment method exists
    pub const fn shows_order_batch_action(&self) -> bool {
        self.payment_method_id.is_some()
    }

    /// Next state after `event`.
    ///
    /// Start events arriving while the same operation is pending are dropped.
    #[must_use]
    pub fn apply(mut self, event: CheckoutEvent) -> Self {
        match event {
            CheckoutEvent::FieldChanged { field, value } => {
                self.form = self.form.with_field(field, &value);
            }

            CheckoutEvent::TokenizerFailed(error) => {
                self.setup_failed = true;
                self.card_error = Some(error);
            }

            CheckoutEvent::CardSubmitStarted => {
                if !self.can_submit_card() {
                    tracing::debug!("Card submission already in flight");
                    return self;
                }
                self.card_submitting = true;
                self.card_error = None;
                self.card_message = None;
                self.payment_method_id = None;
            }

            CheckoutEvent::CardRejected(error) => {
                self.card_submitting = false;
                self.card_error = Some(error);
            }

            CheckoutEvent::PaymentMethodCreated {
                message,
                payment_method_id,
            } => {
                self.card_submitting = false;
                self.card_message = Some(message);
                self.payment_method_id = Some(payment_method_id);
            }

            CheckoutEvent::PaymentMethodFailed(message) => {
                self.card_submitting = false;
                self.card_message = Some(message);
            }

            CheckoutEvent::BatchSubmitStarted => {
                if !self.can_submit_batch() {
                    tracing::debug!("Order batch submission ignored");
                    return self;
                }
                self.batch_submitting = true;
                self.batch_message = None;
            }

            CheckoutEvent::OrderBatchCreated { message, data } => {
                self.batch_submitting = false;
                self.batch_message = Some(message);
                self.batch_data = Some(data);
            }

            CheckoutEvent::OrderBatchFailed(message) => {
                self.batch_submitting = false;
                self.batch_message = Some(message);
            }
        }
        self
    }
}
