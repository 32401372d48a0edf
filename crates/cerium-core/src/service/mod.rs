//! Business logic services (use cases).
//!
//! Services orchestrate repository calls and the policy, guard and projector
//! modules. They depend on traits (ports) -- never on concrete
//! infrastructure implementations.

pub mod form;
pub mod login;
pub mod response;
pub mod token;

use cerium_types::error::{FormError, RepositoryError};
use cerium_types::identity::Identity;

/// Require a logged-in caller and return their roll number.
pub(crate) fn require_user(identity: &Identity) -> Result<&str, FormError> {
    identity
        .roll_number()
        .ok_or_else(|| FormError::Unauthenticated("Please login to continue".to_string()))
}

/// Log a storage failure with its context and convert it to a `FormError`.
pub(crate) fn storage_failure(
    operation: &'static str,
    identity: &Identity,
    form_id: &dyn std::fmt::Display,
    err: RepositoryError,
) -> FormError {
    tracing::error!(operation, caller = %identity, form_id = %form_id, error = %err, "storage failure");
    FormError::StorageError(err.to_string())
}
