//! # checkout-core
//!
//! Card collection glue between a secure-field vault and the checkout backend.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐  submit  ┌─────────────────┐ token  ┌───────────────────────┐
//! │ Billing form │─────────▶│  SecureFields   │───────▶│ PaymentBackend        │
//! │ (reducer)    │          │  (vault iframe) │        │ create payment method │
//! └──────────────┘          └─────────────────┘        └──────────┬────────────┘
//!                                                                 │ payment_method_id
//!                                                      ┌──────────▼────────────┐
//!                                                      │ create order batch    │
//!                                                      └───────────────────────┘
//! ```
//!
//! Sensitive card data stays inside the vault. The `SecureVault` trait is the
//! seam the browser SDK plugs into; tests substitute stubs.

pub mod backend;
pub mod error;
pub mod flow;
pub mod form;
pub mod format;
pub mod state;
pub mod tokenize;
pub mod wire;

pub use backend::{HttpPaymentBackend, PaymentBackend};
pub use error::{CheckoutError, Operation, Result};
pub use form::{BillingFormValues, Country, FormField};
pub use state::{CheckoutEvent, CheckoutState};
pub use tokenize::{CardTokenizer, SecureField, SecureFields, SecureVault, VaultConfig, VaultOutcome};
pub use wire::{InterimCardToken, PaymentMethodId};
