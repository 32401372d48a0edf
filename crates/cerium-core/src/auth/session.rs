//! SessionCodec trait for signed session credentials.
//!
//! Defined in cerium-core so the resolver and login service can issue and
//! check credentials without coupling to a token format. The HS256 JWT
//! adapter lives in cerium-infra.

use cerium_types::error::SessionError;
use cerium_types::identity::SessionClaims;

/// Signs and verifies session claims.
pub trait SessionCodec: Send + Sync {
    /// Produce a signed token carrying `claims`.
    fn sign(&self, claims: &SessionClaims) -> Result<String, SessionError>;

    /// Check signature and expiry and return the embedded claims.
    fn verify(&self, token: &str) -> Result<SessionClaims, SessionError>;
}
