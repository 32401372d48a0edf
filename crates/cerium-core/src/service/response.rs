//! Response submission and export service.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use cerium_types::error::FormError;
use cerium_types::form::{Form, FormId};
use cerium_types::identity::Identity;
use cerium_types::response::{
    FILLER_FIELD, FormResponse, ResponseId, SubmitResponse, TIMESTAMP_FIELD,
};

use crate::guard::SingleResponseGuard;
use crate::policy;
use crate::projector;
use crate::repository::filler::FillerRepository;
use crate::repository::form::FormRepository;
use crate::repository::response::ResponseRepository;
use crate::service::storage_failure;

/// Service for accepting submissions and reading them back.
pub struct ResponseService<F, R, M>
where
    F: FormRepository,
    R: ResponseRepository,
    M: FillerRepository,
{
    forms: F,
    responses: R,
    guard: SingleResponseGuard<M>,
}

impl<F, R, M> ResponseService<F, R, M>
where
    F: FormRepository,
    R: ResponseRepository,
    M: FillerRepository,
{
    pub fn new(forms: F, responses: R, markers: M) -> Self {
        Self {
            forms,
            responses,
            guard: SingleResponseGuard::new(markers),
        }
    }

    /// Accept a submission from `identity`.
    ///
    /// The filler marker is written before the response so that a racing
    /// duplicate on a single-response form is refused by the marker's
    /// uniqueness rather than stored.
    pub async fn submit(
        &self,
        identity: &Identity,
        form_id: &FormId,
        body: SubmitResponse,
    ) -> Result<ResponseId, FormError> {
        let form = self.load_form(identity, form_id).await?;

        let now = Utc::now();
        let has_filled = self.guard.has_filled(&form, identity).await?;
        if let Err(denial) = policy::can_submit(&form, identity, has_filled, now) {
            tracing::debug!(form_id = %form.id, filler = %identity, ?denial, "submission refused");
            return Err(denial.into());
        }

        self.guard.record(&form, identity).await?;

        let mut responses = body.responses;
        responses.insert(
            TIMESTAMP_FIELD.to_string(),
            Value::String(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        let filler = if form.collect_email {
            responses.insert(
                FILLER_FIELD.to_string(),
                Value::String(identity.key().to_string()),
            );
            Some(identity.key().to_string())
        } else {
            responses.remove(FILLER_FIELD);
            None
        };

        let response = FormResponse {
            id: ResponseId::new(),
            form_id: form.id.clone(),
            timestamp: now,
            filler,
            responses,
        };

        self.responses
            .create(&response)
            .await
            .map_err(|e| storage_failure("create response", identity, &form.id, e))?;

        tracing::info!(form_id = %form.id, response_id = %response.id, filler = %identity, "response recorded");
        Ok(response.id)
    }

    /// Stored responses of a form, in submission order.
    ///
    /// Access follows [`policy::can_export`].
    pub async fn list_responses(
        &self,
        identity: &Identity,
        form_id: &FormId,
        token: Option<&str>,
    ) -> Result<Vec<FormResponse>, FormError> {
        let form = self.authorize_export(identity, form_id, token).await?;
        self.responses
            .list_for_form(&form.id)
            .await
            .map_err(|e| storage_failure("list responses", identity, &form.id, e))
    }

    /// Responses of a form projected to a header row plus one row each.
    pub async fn export_table(
        &self,
        identity: &Identity,
        form_id: &FormId,
        token: Option<&str>,
    ) -> Result<Vec<Vec<String>>, FormError> {
        let form = self.authorize_export(identity, form_id, token).await?;
        let responses = self
            .responses
            .list_for_form(&form.id)
            .await
            .map_err(|e| storage_failure("list responses", identity, &form.id, e))?;

        tracing::debug!(form_id = %form.id, rows = responses.len(), "responses exported");
        Ok(projector::project_rows(&form, &responses))
    }

    async fn load_form(&self, identity: &Identity, form_id: &FormId) -> Result<Form, FormError> {
        self.forms
            .get_by_id(form_id)
            .await
            .map_err(|e| storage_failure("get form", identity, form_id, e))?
            .ok_or(FormError::NotFound)
    }

    /// Resolve the form for an export and check access.
    ///
    /// An anonymous caller without a token is asked to log in. Every other
    /// refusal, a missing form included, is the same `Forbidden` so the
    /// existence of a form id is not observable.
    async fn authorize_export(
        &self,
        identity: &Identity,
        form_id: &FormId,
        token: Option<&str>,
    ) -> Result<Form, FormError> {
        let token = token.map(str::trim).filter(|t| !t.is_empty());
        if identity.is_anonymous() && token.is_none() {
            return Err(export_refusal(identity, token));
        }

        let denied = || export_refusal(identity, token);
        let Some(form) = self
            .forms
            .get_by_id(form_id)
            .await
            .map_err(|e| storage_failure("get form", identity, form_id, e))?
        else {
            tracing::info!(%form_id, caller = %identity, "export of unknown form refused");
            return Err(denied());
        };

        if !policy::can_export(&form, identity, token) {
            tracing::info!(form_id = %form.id, caller = %identity, "export refused");
            return Err(denied());
        }
        Ok(form)
    }
}

/// The error for an export that cannot be granted.
///
/// An anonymous caller without a token is asked to log in; every other
/// refusal is `Forbidden`. Also used for ids that cannot name a form at all.
pub fn export_refusal(identity: &Identity, token: Option<&str>) -> FormError {
    let has_token = token.is_some_and(|t| !t.trim().is_empty());
    if identity.is_anonymous() && !has_token {
        FormError::Unauthenticated("Please login to continue".to_string())
    } else {
        FormError::Forbidden("not allowed to view these responses".to_string())
    }
}
