//! Secure Field Tokenization
//!
//! The card number, expiry and CVC are collected by an external vault inside
//! iframes it owns. This module never sees those values: it binds the vault to
//! the page's mount points, asks it to submit, and turns the answer into either
//! an [`InterimCardToken`] or a user-facing message.
//!
//! ```text
//! Uninitialized ──initialize──▶ Loading ──▶ Ready ◀──────────┐
//!                                 │           │              │
//!                         (missing mount)   submit      resolved/rejected
//!                                 ▼           ▼              │
//!                           Uninitialized  Submitting ───────┘
//! ```

use std::cell::Cell;
use std::convert::Infallible;
use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CheckoutError, Result};
use crate::wire::InterimCardToken;

/// Vault route that stores the tokenized card and answers with an interim key
pub const INTERIM_CARD_PATH: &str = "/vgs/inbound/create_interim_card";

/// Key carrying the token in a successful vault response
pub const INTERIM_CARD_TOKEN_KEY: &str = "interim_card_token";

/// Secure fields rendered by the vault
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SecureField {
    CardNumber,
    CardExpiration,
    CardCvc,
}

impl SecureField {
    pub const ALL: [Self; 3] = [Self::CardNumber, Self::CardExpiration, Self::CardCvc];

    /// DOM id of the element the vault iframe replaces
    pub const fn mount_id(self) -> &'static str {
        match self {
            Self::CardNumber => "card-number",
            Self::CardExpiration => "card-expiration",
            Self::CardCvc => "card-cvc",
        }
    }

    pub const fn selector(self) -> &'static str {
        match self {
            Self::CardNumber => "#card-number",
            Self::CardExpiration => "#card-expiration",
            Self::CardCvc => "#card-cvc",
        }
    }

    /// Field name the vault uses in submissions and error payloads
    pub const fn vault_name(self) -> &'static str {
        match self {
            Self::CardNumber => "card_number",
            Self::CardExpiration => "card_expiration",
            Self::CardCvc => "card_cvc",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CardNumber => "Card number",
            Self::CardExpiration => "Card expiration date",
            Self::CardCvc => "CVC",
        }
    }

    pub fn from_vault_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.vault_name() == name)
    }
}

/// Human-readable label for a vault field key; unknown keys pass through.
pub fn field_label(vault_name: &str) -> &str {
    match SecureField::from_vault_name(vault_name) {
        Some(field) => field.label(),
        None => vault_name,
    }
}

/// Vault deployment target
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VaultEnvironment {
    #[default]
    Sandbox,
    Live,
}

impl VaultEnvironment {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Live => "live",
        }
    }

}

/// Unrecognised names fall back to the sandbox
impl FromStr for VaultEnvironment {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "live" | "production" => Self::Live,
            _ => Self::Sandbox,
        })
    }
}

/// Vault connection settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VaultConfig {
    pub vault_id: String,
    pub environment: VaultEnvironment,
    pub cname: Option<String>,
    /// Local satellite port, used only in development
    pub satellite_port: Option<u16>,
    pub sdk_version: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            vault_id: "tntfizwd8io".into(),
            environment: VaultEnvironment::Sandbox,
            cname: Some("vgs-sandbox.ongoody.com".into()),
            satellite_port: None,
            sdk_version: "2.12.0".into(),
        }
    }
}

impl VaultConfig {
    pub const SATELLITE_PORT: u16 = 9098;

    /// Build from optional overrides, falling back to sandbox defaults
    pub fn from_overrides(
        vault_id: Option<&str>,
        environment: Option<&str>,
        cname: Option<&str>,
        use_satellite: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            vault_id: vault_id.map_or(defaults.vault_id, str::to_string),
            environment: environment
                .and_then(|e| e.parse().ok())
                .unwrap_or(defaults.environment),
            cname: cname.map(str::to_string).or(defaults.cname),
            satellite_port: (use_satellite == Some("true")).then_some(Self::SATELLITE_PORT),
            sdk_version: defaults.sdk_version,
        }
    }

    pub fn script_url(&self) -> String {
        format!(
            "https://js.verygoodvault.com/vgs-collect/{}/vgs-collect.js",
            self.sdk_version
        )
    }
}

/// What the vault reported for a submission
#[derive(Clone, Debug, PartialEq)]
pub enum VaultOutcome {
    /// Submission reached the vault route; payload is the route's response
    Accepted(Value),
    /// Client-side validation failed; payload is keyed by vault field name
    Rejected(Value),
}

/// External vault capability
///
/// Implemented over the vendor SDK in the browser and by stubs in tests.
#[async_trait(?Send)]
pub trait SecureVault {
    /// Load and configure the vendor SDK
    async fn load(&self) -> Result<()>;

    /// Check whether the page contains the mount point for `field`
    fn mount_point_present(&self, field: SecureField) -> bool;

    /// Render the secure iframe for `field` into its mount point
    fn bind(&self, field: SecureField) -> Result<()>;

    /// Validate and submit all bound fields to a vault route
    async fn submit(&self, path: &str) -> Result<VaultOutcome>;
}

/// Anything that can turn the secure fields into an interim card token
#[async_trait(?Send)]
pub trait CardTokenizer {
    async fn interim_card_token(&self) -> Result<InterimCardToken>;
}

/// Tokenizer lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenizerPhase {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Submitting,
}

/// Secure fields bound to a vault
pub struct SecureFields<V> {
    vault: V,
    phase: Cell<TokenizerPhase>,
}

impl<V: SecureVault> SecureFields<V> {
    pub const fn new(vault: V) -> Self {
        Self {
            vault,
            phase: Cell::new(TokenizerPhase::Uninitialized),
        }
    }

    pub fn phase(&self) -> TokenizerPhase {
        self.phase.get()
    }

    pub const fn vault(&self) -> &V {
        &self.vault
    }

    /// Load the vault and bind the three secure fields.
    ///
    /// Idempotent once ready. A call made while another is still loading
    /// gets `NotReady`. Fails without binding anything if a mount point is
    /// missing, leaving the fields uninitialized.
    pub async fn initialize(&self) -> Result<()> {
        match self.phase.get() {
            TokenizerPhase::Uninitialized => {}
            TokenizerPhase::Loading => return Err(CheckoutError::NotReady),
            phase @ (TokenizerPhase::Ready | TokenizerPhase::Submitting) => {
                tracing::debug!(?phase, "Secure fields already initialized");
                return Ok(());
            }
        }

        self.phase.set(TokenizerPhase::Loading);

        if let Err(e) = self.vault.load().await {
            self.phase.set(TokenizerPhase::Uninitialized);
            return Err(e);
        }

        let missing: Vec<String> = SecureField::ALL
            .into_iter()
            .filter(|f| !self.vault.mount_point_present(*f))
            .map(|f| f.selector().to_string())
            .collect();

        if !missing.is_empty() {
            self.phase.set(TokenizerPhase::Uninitialized);
            tracing::error!(?missing, "Secure field mount points missing");
            return Err(CheckoutError::MissingMountPoint(missing));
        }

        for field in SecureField::ALL {
            if let Err(e) = self.vault.bind(field) {
                self.phase.set(TokenizerPhase::Uninitialized);
                return Err(e);
            }
        }

        self.phase.set(TokenizerPhase::Ready);
        tracing::info!("Secure fields ready");
        Ok(())
    }

    /// Submit the secure fields and extract the interim card token.
    pub async fn submit(&self) -> Result<InterimCardToken> {
        if self.phase.get() != TokenizerPhase::Ready {
            return Err(CheckoutError::NotReady);
        }

        self.phase.set(TokenizerPhase::Submitting);
        let outcome = self.vault.submit(INTERIM_CARD_PATH).await;
        self.phase.set(TokenizerPhase::Ready);

        match outcome? {
            VaultOutcome::Accepted(payload) => extract_interim_token(&payload),
            VaultOutcome::Rejected(errors) => {
                Err(CheckoutError::FieldValidation(compose_validation_errors(&errors)))
            }
        }
    }
}

#[async_trait(?Send)]
impl<V: SecureVault> CardTokenizer for SecureFields<V> {
    async fn interim_card_token(&self) -> Result<InterimCardToken> {
        self.submit().await
    }
}

/// Pull the interim token out of a vault route response
pub fn extract_interim_token(payload: &Value) -> Result<InterimCardToken> {
    payload
        .get(INTERIM_CARD_TOKEN_KEY)
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(InterimCardToken::from_string)
        .ok_or_else(|| CheckoutError::TokenizationTransport("An error occurred.".into()))
}

/// One line per invalid field: "<label> <first error message>".
///
/// Lines follow the order of the payload's keys.
pub fn compose_validation_errors(errors: &Value) -> String {
    let Some(fields) = errors.as_object() else {
        return "An error occurred.".into();
    };

    fields
        .iter()
        .map(|(name, detail)| {
            let message = detail
                .get("errorMessages")
                .and_then(Value::as_array)
                .and_then(|msgs| msgs.first())
                .and_then(Value::as_str)
                .unwrap_or("is invalid");
            format!("{} {}", field_label(name), message)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    struct StubVault {
        present: Vec<SecureField>,
        outcome: RefCell<Option<Result<VaultOutcome>>>,
        bound: RefCell<Vec<SecureField>>,
        loads: Cell<u32>,
    }

    impl StubVault {
        fn with_outcome(outcome: Result<VaultOutcome>) -> Self {
            Self {
                present: SecureField::ALL.to_vec(),
                outcome: RefCell::new(Some(outcome)),
                bound: RefCell::new(Vec::new()),
                loads: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl SecureVault for StubVault {
        async fn load(&self) -> Result<()> {
            self.loads.set(self.loads.get() + 1);
            tokio::task::yield_now().await;
            Ok(())
        }

        fn mount_point_present(&self, field: SecureField) -> bool {
            self.present.contains(&field)
        }

        fn bind(&self, field: SecureField) -> Result<()> {
            self.bound.borrow_mut().push(field);
            Ok(())
        }

        async fn submit(&self, path: &str) -> Result<VaultOutcome> {
            assert_eq!(path, INTERIM_CARD_PATH);
            self.outcome
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Ok(VaultOutcome::Accepted(json!({}))))
        }
    }

    #[test]
    fn test_compose_single_error() {
        let errors = json!({"card_cvc": {"errorMessages": ["invalid"]}});
        assert_eq!(compose_validation_errors(&errors), "CVC invalid");
    }

    #[test]
    fn test_compose_keeps_payload_order() {
        let errors = json!({
            "card_number": {"errorMessages": ["is required", "is not a valid card number"]},
            "card_expiration": {"errorMessages": ["is not a valid expiration date"]},
            "card_cvc": {"errorMessages": []},
            "postal": {"errorMessages": ["is required"]}
        });

        assert_eq!(
            compose_validation_errors(&errors),
            "Card number is required\n\
             Card expiration date is not a valid expiration date\n\
             CVC is invalid\n\
             postal is required"
        );
    }

    #[test]
    fn test_extract_token() {
        let token = extract_interim_token(&json!({"interim_card_token": "tok_123"})).unwrap();
        assert_eq!(token.as_str(), "tok_123");

        let err = extract_interim_token(&json!({"status": "ok"})).unwrap_err();
        assert_eq!(err.to_string(), "An error occurred.");
    }

    #[test]
    fn test_vault_config_overrides() {
        let config = VaultConfig::from_overrides(Some("vault_live"), Some("live"), None, Some("true"));
        assert_eq!(config.vault_id, "vault_live");
        assert_eq!(config.environment, VaultEnvironment::Live);
        assert_eq!(config.cname.as_deref(), Some("vgs-sandbox.ongoody.com"));
        assert_eq!(config.satellite_port, Some(9098));
        assert_eq!(
            config.script_url(),
            "https://js.verygoodvault.com/vgs-collect/2.12.0/vgs-collect.js"
        );

        assert_eq!(VaultConfig::from_overrides(None, None, None, None), VaultConfig::default());
    }

    #[tokio::test]
    async fn test_initialize_binds_all_fields_once() {
        let fields = SecureFields::new(StubVault::with_outcome(Ok(VaultOutcome::Accepted(json!({})))));

        fields.initialize().await.unwrap();
        fields.initialize().await.unwrap();

        assert_eq!(fields.phase(), TokenizerPhase::Ready);
        assert_eq!(fields.vault().loads.get(), 1);
        assert_eq!(*fields.vault().bound.borrow(), SecureField::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_missing_mount_point_aborts() {
        let mut vault = StubVault::with_outcome(Ok(VaultOutcome::Accepted(json!({}))));
        vault.present = vec![SecureField::CardNumber];
        let fields = SecureFields::new(vault);

        let err = fields.initialize().await.unwrap_err();

        assert!(matches!(err, CheckoutError::MissingMountPoint(ref m) if m == &["#card-expiration", "#card-cvc"]));
        assert_eq!(fields.phase(), TokenizerPhase::Uninitialized);
        assert!(fields.vault().bound.borrow().is_empty());
        assert!(matches!(fields.submit().await, Err(CheckoutError::NotReady)));
    }

    #[tokio::test]
    async fn test_initialize_while_loading_is_not_ready() {
        let mut vault = StubVault::with_outcome(Ok(VaultOutcome::Accepted(json!({}))));
        vault.present = Vec::new();
        let fields = SecureFields::new(vault);

        let (first, second) = tokio::join!(fields.initialize(), fields.initialize());

        assert!(matches!(first, Err(CheckoutError::MissingMountPoint(_))));
        assert!(matches!(second, Err(CheckoutError::NotReady)));
        assert_eq!(fields.phase(), TokenizerPhase::Uninitialized);
        assert_eq!(fields.vault().loads.get(), 1);
    }

    #[test]
    fn test_field_label_passes_unknown_keys_through() {
        let key = String::from("postal");
        assert_eq!(field_label(&key), "postal");
        assert_eq!(field_label("card_expiration"), "Card expiration date");
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("LIVE".parse::<VaultEnvironment>(), Ok(VaultEnvironment::Live));
        assert_eq!("production".parse::<VaultEnvironment>(), Ok(VaultEnvironment::Live));
        assert_eq!("staging".parse::<VaultEnvironment>(), Ok(VaultEnvironment::Sandbox));
    }

    #[tokio::test]
    async fn test_submit_before_ready() {
        let fields = SecureFields::new(StubVault::with_outcome(Ok(VaultOutcome::Accepted(json!({})))));
        let err = fields.submit().await.unwrap_err();
        assert_eq!(err.to_string(), "Credit card form not ready");
    }

    #[tokio::test]
    async fn test_submit_resolves_token() {
        let fields = SecureFields::new(StubVault::with_outcome(Ok(VaultOutcome::Accepted(
            json!({"interim_card_token": "tok_123"}),
        ))));
        fields.initialize().await.unwrap();

        let token = fields.interim_card_token().await.unwrap();

        assert_eq!(token.as_str(), "tok_123");
        assert_eq!(fields.phase(), TokenizerPhase::Ready);
    }

    #[tokio::test]
    async fn test_submit_rejected_then_ready_again() {
        let fields = SecureFields::new(StubVault::with_outcome(Ok(VaultOutcome::Rejected(
            json!({"card_cvc": {"errorMessages": ["invalid"]}}),
        ))));
        fields.initialize().await.unwrap();

        let err = fields.submit().await.unwrap_err();
        assert!(matches!(err, CheckoutError::FieldValidation(ref m) if m == "CVC invalid"));
        assert_eq!(fields.phase(), TokenizerPhase::Ready);

        // Second attempt goes through to the vault again
        let err = fields.submit().await.unwrap_err();
        assert_eq!(err.to_string(), "An error occurred.");
    }

    #[tokio::test]
    async fn test_submit_transport_failure() {
        let fields = SecureFields::new(StubVault::with_outcome(Err(
            CheckoutError::TokenizationTransport("network down".into()),
        )));
        fields.initialize().await.unwrap();

        let err = fields.submit().await.unwrap_err();
        assert_eq!(err.to_string(), "network down");
        assert_eq!(fields.phase(), TokenizerPhase::Ready);
    }
}
