//! User profile repository trait definition.

use cerium_types::error::RepositoryError;
use cerium_types::identity::UserProfile;

/// Repository trait for identity-provider profiles, keyed by roll number.
pub trait UserRepository: Send + Sync {
    /// Insert or replace the profile with the same roll number.
    fn upsert(
        &self,
        profile: &UserProfile,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get(
        &self,
        roll_number: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserProfile>, RepositoryError>> + Send;
}
