//! Identity resolver.
//!
//! Turns an optional session credential into an [`Identity`]. Endpoints that
//! mandate login call [`IdentityResolver::resolve`] with `required = true`
//! and get `Unauthenticated` for anything but a valid credential; endpoints
//! where login is optional get `Identity::Anonymous` instead of an error.

use cerium_types::error::AuthError;
use cerium_types::identity::Identity;

use super::session::SessionCodec;

/// Resolves session credentials to caller identities.
pub struct IdentityResolver<C: SessionCodec> {
    codec: C,
}

impl<C: SessionCodec> IdentityResolver<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    /// Resolve `credential` to an identity.
    ///
    /// Never fails when `required` is false.
    pub fn resolve(&self, credential: Option<&str>, required: bool) -> Result<Identity, AuthError> {
        let Some(token) = credential.map(str::trim).filter(|t| !t.is_empty()) else {
            return if required {
                Err(AuthError::Unauthenticated(
                    "Please login to continue".to_string(),
                ))
            } else {
                Ok(Identity::Anonymous)
            };
        };

        match self.codec.verify(token) {
            Ok(claims) if !claims.roll_number.is_empty() => Ok(Identity::User(claims.roll_number)),
            Ok(_) => self.reject("session carries no identity", required),
            Err(e) => self.reject(&e.to_string(), required),
        }
    }

    fn reject(&self, reason: &str, required: bool) -> Result<Identity, AuthError> {
        tracing::debug!(reason, required, "session credential rejected");
        if required {
            Err(AuthError::Unauthenticated(reason.to_string()))
        } else {
            Ok(Identity::Anonymous)
        }
    }
}
