//! Error Types

use thiserror::Error;

/// Result type alias for checkout operations
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Backend operation that failed, used to word transport errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    CreatePaymentMethod,
    CreateOrderBatch,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatePaymentMethod => "create payment method",
            Self::CreateOrderBatch => "create order batch",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checkout error types
///
/// Every variant renders as the exact string shown to the user.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// One or more secure-field mount points are absent from the page
    #[error("Credit card form fields are missing: {}", .0.join(", "))]
    MissingMountPoint(Vec<String>),

    /// Vault SDK could not be loaded or configured
    #[error("Credit card form failed to load: {0}")]
    VaultUnavailable(String),

    /// Submission attempted before the secure fields were ready
    #[error("Credit card form not ready")]
    NotReady,

    /// Per-field validation failure, already composed one line per field
    #[error("{0}")]
    FieldValidation(String),

    /// Required billing fields left blank
    #[error("Please fill in: {}", .0.join(", "))]
    MissingBillingFields(Vec<&'static str>),

    /// Tokenization round-trip failed or returned no token
    #[error("{0}")]
    TokenizationTransport(String),

    /// Backend answered with a non-success status
    #[error("{}", http_message(*.status, .message.as_deref()))]
    BackendHttp { status: u16, message: Option<String> },

    /// Backend could not be reached or its answer could not be read
    #[error("Failed to {operation}: {message}")]
    BackendTransport { operation: Operation, message: String },
}

fn http_message(status: u16, message: Option<&str>) -> String {
    match message {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => format!("HTTP error! Status: {status}"),
    }
}

impl CheckoutError {
    /// Check if the user can fix this by editing the form and resubmitting
    pub const fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::FieldValidation(_) | Self::MissingBillingFields(_)
        )
    }

    /// Check if setup failed and the secure fields will never become usable
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingMountPoint(_) | Self::VaultUnavailable(_))
    }
}
