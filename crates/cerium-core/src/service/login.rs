//! Login service: OAuth code exchange, profile storage and session issue.

use chrono::{DateTime, Duration, Utc};

use cerium_types::error::{AuthError, ProviderError, UpstreamStage};
use cerium_types::identity::{AuthCode, Identity, SessionClaims, UserProfile};

use crate::auth::provider::IdentityProvider;
use crate::auth::session::SessionCodec;
use crate::repository::user::UserRepository;

/// A freshly signed session credential.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct LoginService<U, P, C>
where
    U: UserRepository,
    P: IdentityProvider,
    C: SessionCodec,
{
    users: U,
    provider: P,
    codec: C,
    session_ttl: Duration,
}

impl<U, P, C> LoginService<U, P, C>
where
    U: UserRepository,
    P: IdentityProvider,
    C: SessionCodec,
{
    pub fn new(users: U, provider: P, codec: C, session_ttl: Duration) -> Self {
        Self {
            users,
            provider,
            codec,
            session_ttl,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Complete a login.
    ///
    /// 1. Exchanges the authorization code for an access token
    /// 2. Fetches the caller's profile with it
    /// 3. Upserts the profile by roll number
    /// 4. Signs a session for that roll number
    pub async fn login(&self, auth: &AuthCode) -> Result<(UserProfile, Session), AuthError> {
        if auth.code.trim().is_empty() {
            return Err(AuthError::Unauthenticated(
                "missing authorization code".to_string(),
            ));
        }

        let access_token = self
            .provider
            .exchange_code(&auth.code, &auth.redirect_uri)
            .await
            .map_err(|e| upstream(UpstreamStage::TokenExchange, e))?;

        let profile = self
            .provider
            .fetch_profile(&access_token)
            .await
            .map_err(|e| upstream(UpstreamStage::Profile, e))?;

        if profile.roll_number.trim().is_empty() {
            return Err(upstream(
                UpstreamStage::Profile,
                ProviderError::Decode("profile has no roll number".to_string()),
            ));
        }

        self.users.upsert(&profile).await.map_err(|e| {
            tracing::error!(roll_number = %profile.roll_number, error = %e, "failed to store profile");
            AuthError::StorageError(e.to_string())
        })?;

        let session = self.issue_session(&profile.roll_number)?;
        tracing::info!(roll_number = %profile.roll_number, "user logged in");
        Ok((profile, session))
    }

    /// Sign a session credential for `roll_number`, valid for the configured
    /// lifetime.
    pub fn issue_session(&self, roll_number: &str) -> Result<Session, AuthError> {
        let expires_at = Utc::now() + self.session_ttl;
        let claims = SessionClaims {
            roll_number: roll_number.to_string(),
            exp: expires_at.timestamp(),
        };
        let token = self
            .codec
            .sign(&claims)
            .map_err(|e| AuthError::Signing(e.to_string()))?;
        Ok(Session { token, expires_at })
    }

    /// The stored profile of a logged-in caller.
    pub async fn profile(&self, identity: &Identity) -> Result<UserProfile, AuthError> {
        let Some(roll_number) = identity.roll_number() else {
            return Err(AuthError::Unauthenticated(
                "Please login to continue".to_string(),
            ));
        };

        self.users
            .get(roll_number)
            .await
            .map_err(|e| {
                tracing::error!(roll_number, error = %e, "failed to load profile");
                AuthError::StorageError(e.to_string())
            })?
            .ok_or(AuthError::ProfileNotFound)
    }
}

fn upstream(stage: UpstreamStage, err: ProviderError) -> AuthError {
    tracing::warn!(%stage, error = %err, "identity provider call failed");
    AuthError::Upstream {
        stage,
        message: err.to_string(),
    }
}
