//! reqwest-backed `IdentityProvider` for the authorization-code flow.
//!
//! The token endpoint takes a form-encoded body with HTTP Basic client
//! credentials; the profile endpoint takes the bearer access token.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use cerium_core::auth::provider::IdentityProvider;
use cerium_types::config::OAuthConfig;
use cerium_types::error::ProviderError;
use cerium_types::identity::UserProfile;

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

/// HTTP client for the configured OAuth provider.
#[derive(Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    token_url: String,
    profile_url: String,
    basic_auth: SecretString,
}

impl OAuthClient {
    /// Build a client whose calls time out after `timeout`.
    pub fn new(config: &OAuthConfig, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("cerium/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            http,
            token_url: config.token_url.clone(),
            profile_url: config.profile_url.clone(),
            basic_auth: SecretString::from(config.basic_auth.clone()),
        }
    }
}

fn transport(e: reqwest::Error) -> ProviderError {
    ProviderError::Transport(e.to_string())
}

impl IdentityProvider for OAuthClient {
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String, ProviderError> {
        let resp = self
            .http
            .post(&self.token_url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Basic {}", self.basic_auth.expose_secret()),
            )
            .form(&[
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status().as_u16()));
        }

        let body: AccessTokenResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        tracing::debug!("authorization code exchanged");
        Ok(body.access_token)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, ProviderError> {
        let resp = self
            .http
            .get(&self.profile_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status().as_u16()));
        }

        resp.json::<UserProfile>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}
