//! Backend and vault settings
//!
//! Values are fixed at build time from the environment, falling back to the
//! sandbox deployment.

use checkout_core::{HttpPaymentBackend, VaultConfig, backend::DEFAULT_API_BASE_URL};

pub fn api_base_url() -> &'static str {
    option_env!("API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL)
}

/// Client for the checkout backend
pub fn backend() -> HttpPaymentBackend {
    HttpPaymentBackend::new(api_base_url())
}

pub fn vault_config() -> VaultConfig {
    VaultConfig::from_overrides(
        option_env!("GOODY_VGS_VAULT_ID"),
        option_env!("GOODY_VGS_ENVIRONMENT"),
        option_env!("GOODY_VGS_CNAME"),
        option_env!("GOODY_VGS_LOCAL"),
    )
}
