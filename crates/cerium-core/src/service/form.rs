//! Form lifecycle service.
//!
//! Creates, updates, reads, lists and deletes forms. Deleting a form cascades
//! to its responses and filler markers.

use std::collections::HashSet;

use chrono::Utc;

use cerium_types::error::{FormError, RepositoryError};
use cerium_types::form::{
    CreatedForm, Form, FormDraft, FormId, FormSummary, FormView, Page, normalize_close_on,
};
use cerium_types::identity::Identity;

use crate::guard::SingleResponseGuard;
use crate::policy;
use crate::repository::filler::FillerRepository;
use crate::repository::form::FormRepository;
use crate::repository::response::ResponseRepository;
use crate::service::token::TokenGenerator;
use crate::service::{require_user, storage_failure};

/// Service orchestrating the form lifecycle.
///
/// Generic over repository and token traits -- cerium-core never depends on
/// cerium-infra.
pub struct FormService<F, R, M, T>
where
    F: FormRepository,
    R: ResponseRepository,
    M: FillerRepository,
    T: TokenGenerator,
{
    forms: F,
    responses: R,
    guard: SingleResponseGuard<M>,
    tokens: T,
}

impl<F, R, M, T> FormService<F, R, M, T>
where
    F: FormRepository,
    R: ResponseRepository,
    M: FillerRepository,
    T: TokenGenerator,
{
    pub fn new(forms: F, responses: R, markers: M, tokens: T) -> Self {
        Self {
            forms,
            responses,
            guard: SingleResponseGuard::new(markers),
            tokens,
        }
    }

    /// Create a new form owned by the caller.
    ///
    /// 1. Rejects an empty page set and widgets without a question
    /// 2. Assigns uids to widgets lacking one
    /// 3. Names the form after its first page
    /// 4. Generates the response token and stamps creator and time
    pub async fn create_form(
        &self,
        identity: &Identity,
        draft: FormDraft,
    ) -> Result<CreatedForm, FormError> {
        let creator = require_user(identity)?;
        let pages = self.prepare_pages(draft.pages)?;

        let form = Form {
            id: FormId::new(),
            name: pages[0].title.clone(),
            creator: creator.to_string(),
            timestamp: Utc::now(),
            pages,
            require_login: draft.require_login,
            collect_email: draft.collect_email,
            single_response: draft.single_response,
            is_closed: draft.is_closed,
            close_on: normalize_close_on(draft.close_on),
            response_token: self.tokens.response_token(),
        };

        self.forms
            .create(&form)
            .await
            .map_err(|e| storage_failure("create form", identity, &form.id, e))?;

        tracing::info!(creator, form_id = %form.id, "new form");

        Ok(CreatedForm {
            id: form.id,
            token: form.response_token,
        })
    }

    /// Replace a form's content. Only the creator may do this; any other
    /// caller gets `NotFound` whether or not the form exists.
    pub async fn update_form(
        &self,
        identity: &Identity,
        id: &FormId,
        draft: FormDraft,
    ) -> Result<FormId, FormError> {
        let creator = require_user(identity)?;
        let pages = self.prepare_pages(draft.pages)?;

        let form = Form {
            id: id.clone(),
            name: pages[0].title.clone(),
            creator: creator.to_string(),
            timestamp: Utc::now(),
            pages,
            require_login: draft.require_login,
            collect_email: draft.collect_email,
            single_response: draft.single_response,
            is_closed: draft.is_closed,
            close_on: normalize_close_on(draft.close_on),
            response_token: String::new(),
        };

        let matched = self
            .forms
            .replace_owned(id, creator, &form)
            .await
            .map_err(|e| storage_failure("update form", identity, id, e))?;

        if !matched {
            return Err(FormError::NotFound);
        }

        tracing::info!(creator, form_id = %id, "form updated");
        Ok(id.clone())
    }

    /// Read a form as `identity`.
    pub async fn get_form(&self, identity: &Identity, id: &FormId) -> Result<FormView, FormError> {
        let form = self
            .forms
            .get_by_id(id)
            .await
            .map_err(|e| storage_failure("get form", identity, id, e))?
            .ok_or(FormError::NotFound)?;

        let has_filled = if form.single_response && !policy::can_view(&form, identity).editable {
            self.guard.has_filled(&form, identity).await?
        } else {
            false
        };

        let access = policy::check_view(&form, identity, has_filled)?;
        Ok(FormView {
            form,
            can_edit: access.editable,
        })
    }

    /// List the caller's forms, newest first.
    pub async fn list_forms(&self, identity: &Identity) -> Result<Vec<FormSummary>, FormError> {
        let creator = require_user(identity)?;
        let forms = self
            .forms
            .list_by_creator(creator)
            .await
            .map_err(|e| storage_failure("list forms", identity, &"-", e))?;

        tracing::debug!(creator, count = forms.len(), "forms listed");
        Ok(forms)
    }

    /// Delete a form and everything that references it.
    ///
    /// Once the form itself is gone the operation counts as a success: a
    /// failure to remove its responses or markers is logged, leaving orphans
    /// that no read path can reach.
    pub async fn delete_form(&self, identity: &Identity, id: &FormId) -> Result<(), FormError> {
        let creator = require_user(identity)?;
        let form = self
            .forms
            .find_owned(id, creator)
            .await
            .map_err(|e| storage_failure("find form", identity, id, e))?
            .ok_or(FormError::NotFound)?;

        if !policy::can_delete(&form, identity) {
            return Err(FormError::NotFound);
        }

        match self.forms.delete(id).await {
            Ok(()) => {}
            Err(RepositoryError::NotFound) => return Err(FormError::NotFound),
            Err(e) => return Err(storage_failure("delete form", identity, id, e)),
        }

        match self.responses.delete_for_form(id).await {
            Ok(removed) => tracing::debug!(form_id = %id, removed, "responses removed"),
            Err(e) => tracing::warn!(form_id = %id, error = %e, "failed to remove responses of deleted form"),
        }
        if let Err(e) = self.guard.markers().delete_for_form(id).await {
            tracing::warn!(form_id = %id, error = %e, "failed to remove filler markers of deleted form");
        }

        tracing::info!(creator, form_id = %id, "form and its responses deleted");
        Ok(())
    }

    /// Validate pages and assign uids to widgets that lack one.
    ///
    /// Existing uids are kept as sent. Every widget must carry a question,
    /// since it becomes the widget's export column label.
    fn prepare_pages(&self, mut pages: Vec<Page>) -> Result<Vec<Page>, FormError> {
        if pages.is_empty() {
            return Err(FormError::Validation("No Pages".to_string()));
        }

        let mut seen = HashSet::new();
        for (p, page) in pages.iter().enumerate() {
            for (w, widget) in page.widgets.iter().enumerate() {
                if widget.kind.trim().is_empty() {
                    return Err(FormError::Validation(format!(
                        "widget {} on page {} has no type",
                        w + 1,
                        p + 1
                    )));
                }
                if widget.question().is_none() {
                    return Err(FormError::Validation(format!(
                        "widget {} on page {} has no question",
                        w + 1,
                        p + 1
                    )));
                }
                if !widget.uid.is_empty() && !seen.insert(widget.uid.clone()) {
                    return Err(FormError::Validation(format!(
                        "duplicate widget uid '{}'",
                        widget.uid
                    )));
                }
            }
        }

        for widget in pages.iter_mut().flat_map(|p| p.widgets.iter_mut()) {
            if widget.uid.is_empty() {
                let mut uid = self.tokens.widget_uid();
                while !seen.insert(uid.clone()) {
                    uid = self.tokens.widget_uid();
                }
                widget.uid = uid;
            }
        }

        Ok(pages)
    }
}
