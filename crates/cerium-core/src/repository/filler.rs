//! Filler marker repository trait definition.
//!
//! A marker records that an identity has submitted to a form. It carries no
//! response content and exists only to detect repeat submissions.

use cerium_types::error::RepositoryError;
use cerium_types::form::FormId;

/// Outcome of recording a filler marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerOutcome {
    /// The marker was inserted by this call.
    Recorded,
    /// A marker for this (form, filler) pair already existed.
    AlreadyRecorded,
}

/// Repository trait for filler markers.
///
/// `record` must be atomic with respect to concurrent calls for the same
/// pair: at most one caller observes `Recorded`.
pub trait FillerRepository: Send + Sync {
    fn has_filled(
        &self,
        form_id: &FormId,
        filler: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    fn record(
        &self,
        form_id: &FormId,
        filler: &str,
    ) -> impl std::future::Future<Output = Result<MarkerOutcome, RepositoryError>> + Send;

    fn delete_for_form(
        &self,
        form_id: &FormId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
