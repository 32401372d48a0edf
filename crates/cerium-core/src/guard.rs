//! Single-response guard.
//!
//! Tracks which identities have submitted to which forms using filler
//! markers stored apart from the responses themselves. Markers are only
//! consulted and written for forms that require login: anonymous callers
//! all share the empty key, so for open forms the marker would block every
//! anonymous filler after the first. Single-response on forms without login
//! is therefore not enforced.

use cerium_types::error::FormError;
use cerium_types::form::Form;
use cerium_types::identity::Identity;

use crate::repository::filler::{FillerRepository, MarkerOutcome};

pub struct SingleResponseGuard<M: FillerRepository> {
    markers: M,
}

impl<M: FillerRepository> SingleResponseGuard<M> {
    pub fn new(markers: M) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &M {
        &self.markers
    }

    /// Whether `identity` already submitted to `form`.
    ///
    /// Always false for forms that do not require login.
    pub async fn has_filled(&self, form: &Form, identity: &Identity) -> Result<bool, FormError> {
        if !form.require_login {
            return Ok(false);
        }
        self.markers
            .has_filled(&form.id, identity.key())
            .await
            .map_err(|e| FormError::StorageError(e.to_string()))
    }

    /// Record that `identity` is submitting to `form`.
    ///
    /// A no-op for forms without login. When the marker already exists and
    /// the form is single-response, a concurrent submission won the insert
    /// and this one is refused.
    pub async fn record(&self, form: &Form, identity: &Identity) -> Result<(), FormError> {
        if !form.require_login {
            return Ok(());
        }

        let outcome = self
            .markers
            .record(&form.id, identity.key())
            .await
            .map_err(|e| FormError::StorageError(e.to_string()))?;

        match outcome {
            MarkerOutcome::Recorded => Ok(()),
            MarkerOutcome::AlreadyRecorded if form.single_response => {
                tracing::info!(
                    form_id = %form.id,
                    filler = %identity,
                    "lost single-response race, rejecting submission"
                );
                Err(FormError::AlreadyFilled)
            }
            MarkerOutcome::AlreadyRecorded => Ok(()),
        }
    }
}
