//! Global configuration types for Cerium.
//!
//! `CeriumConfig` represents the `config.toml` in the data directory. Every
//! field has a default; environment variables override file values at load
//! time (see `cerium_infra::config`).

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Cerium service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CeriumConfig {
    /// TCP port for `cerium serve`.
    #[serde(default = "default_port")]
    pub port: u16,

    /// HMAC key for session tokens.
    #[serde(default)]
    pub jwt_key: String,

    /// Session token lifetime in hours.
    #[serde(default = "default_session_hours")]
    pub session_hours: i64,

    /// Per-request deadline applied by the HTTP layer.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub oauth: OAuthConfig,
}

/// Identity provider endpoints and client credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Token endpoint for the authorization-code exchange.
    #[serde(default)]
    pub token_url: String,
    /// Profile endpoint queried with the bearer access token.
    #[serde(default)]
    pub profile_url: String,
    /// Pre-encoded `client_id:client_secret` for HTTP Basic auth.
    #[serde(default)]
    pub basic_auth: String,
}

fn default_port() -> u16 {
    8000
}

fn default_session_hours() -> i64 {
    24
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for CeriumConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            jwt_key: String::new(),
            session_hours: default_session_hours(),
            request_timeout_secs: default_request_timeout_secs(),
            oauth: OAuthConfig::default(),
        }
    }
}
