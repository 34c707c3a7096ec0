//! Server Configuration

use std::time::Duration;

/// Goody Commerce API settings
#[derive(Clone, Debug)]
pub struct GoodyConfig {
    /// Bearer API key; payments are disabled without it
    pub api_key: Option<String>,

    /// API origin, e.g. `https://api.sandbox.ongoody.com`
    pub base_url: String,

    /// Commerce end user the demo acts on behalf of
    pub end_user_id: String,

    pub timeout: Duration,
}

impl Default for GoodyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.sandbox.ongoody.com".into(),
            end_user_id: "123".into(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl GoodyConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("GOODY_COMMERCE_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            base_url: std::env::var("GOODY_COMMERCE_API_BASE_URL").unwrap_or(defaults.base_url),
            end_user_id: std::env::var("GOODY_COMMERCE_END_USER_ID").unwrap_or(defaults.end_user_id),
            ..defaults
        }
    }
}

/// HTTP server settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,

    /// Browser origin allowed by CORS
    pub frontend_url: String,

    /// Directory holding the built WASM frontend
    pub static_dir: String,

    pub goody: GoodyConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:4000".into(),
            frontend_url: "http://localhost:4001".into(),
            static_dir: "static".into(),
            goody: GoodyConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let bind_addr = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .map_or(defaults.bind_addr, |port| format!("0.0.0.0:{port}"));

        Self {
            bind_addr,
            frontend_url: std::env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            static_dir: std::env::var("STATIC_DIR").unwrap_or(defaults.static_dir),
            goody: GoodyConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:4000");
        assert_eq!(config.frontend_url, "http://localhost:4001");
        assert_eq!(config.goody.base_url, "https://api.sandbox.ongoody.com");
        assert_eq!(config.goody.end_user_id, "123");
        assert_eq!(config.goody.timeout, Duration::from_secs(30));
        assert!(config.goody.api_key.is_none());
    }
}
