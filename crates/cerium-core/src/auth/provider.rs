//! IdentityProvider trait for the OAuth login flow.

use cerium_types::error::ProviderError;
use cerium_types::identity::UserProfile;

/// External OAuth-style identity provider.
///
/// Only the login flow talks to it; its output (a profile's roll number)
/// becomes the identity embedded in session credentials.
pub trait IdentityProvider: Send + Sync {
    /// Exchange an authorization code for an access token.
    fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send;

    /// Fetch the profile of the user owning `access_token`.
    fn fetch_profile(
        &self,
        access_token: &str,
    ) -> impl std::future::Future<Output = Result<UserProfile, ProviderError>> + Send;
}
