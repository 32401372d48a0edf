//! Response repository trait definition.

use cerium_types::error::RepositoryError;
use cerium_types::form::FormId;
use cerium_types::response::FormResponse;

/// Repository trait for submitted responses. Responses are append-only.
pub trait ResponseRepository: Send + Sync {
    fn create(
        &self,
        response: &FormResponse,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All responses for a form in submission order.
    fn list_for_form(
        &self,
        form_id: &FormId,
    ) -> impl std::future::Future<Output = Result<Vec<FormResponse>, RepositoryError>> + Send;

    /// Delete every response for a form. Returns the number removed.
    fn delete_for_form(
        &self,
        form_id: &FormId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
