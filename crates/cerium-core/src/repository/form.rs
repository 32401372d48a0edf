//! Form repository trait definition.

use cerium_types::error::RepositoryError;
use cerium_types::form::{Form, FormId, FormSummary};

/// Repository trait for form persistence.
///
/// Ownership-scoped operations take the creator alongside the id and match
/// on both in a single query, so a form owned by someone else is
/// indistinguishable from a missing one.
pub trait FormRepository: Send + Sync {
    /// Insert a new form, including its response token.
    fn create(
        &self,
        form: &Form,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a form by id regardless of owner.
    fn get_by_id(
        &self,
        id: &FormId,
    ) -> impl std::future::Future<Output = Result<Option<Form>, RepositoryError>> + Send;

    /// Get a form matching both `id` and `creator`.
    fn find_owned(
        &self,
        id: &FormId,
        creator: &str,
    ) -> impl std::future::Future<Output = Result<Option<Form>, RepositoryError>> + Send;

    /// Replace the editable content of the form matching `id` and `creator`.
    ///
    /// `creator`, `timestamp` and the response token are left untouched.
    /// Returns false when no document matched.
    fn replace_owned(
        &self,
        id: &FormId,
        creator: &str,
        form: &Form,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete a form by id.
    fn delete(
        &self,
        id: &FormId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List a creator's forms, newest first.
    fn list_by_creator(
        &self,
        creator: &str,
    ) -> impl std::future::Future<Output = Result<Vec<FormSummary>, RepositoryError>> + Send;
}
