//! Form authorization policy.
//!
//! Pure decisions over a form and a caller. Nothing here touches storage:
//! whether the caller already filled the form is looked up by the
//! single-response guard and passed in.
//!
//! Ownership rules:
//! - only the creator may edit, update or delete a form
//! - export is granted to the creator, or to anyone presenting the form's
//!   export secret (response token followed by form id)

use chrono::{DateTime, Utc};
use subtle::ConstantTimeEq;

use cerium_types::error::FormError;
use cerium_types::form::Form;
use cerium_types::identity::Identity;

/// What a viewer may do with a form they can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewAccess {
    pub editable: bool,
}

/// Why a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDenial {
    LoginRequired,
    Closed,
    AlreadyFilled,
}

impl From<SubmitDenial> for FormError {
    fn from(denial: SubmitDenial) -> Self {
        match denial {
            SubmitDenial::LoginRequired => {
                FormError::Unauthenticated("Please login to fill this form".to_string())
            }
            SubmitDenial::Closed => FormError::Closed,
            SubmitDenial::AlreadyFilled => FormError::AlreadyFilled,
        }
    }
}

pub fn can_view(form: &Form, identity: &Identity) -> ViewAccess {
    ViewAccess {
        editable: can_mutate(form, identity),
    }
}

/// Full gate for reading a form.
///
/// Login-required forms are hidden from anonymous callers. A non-owner who
/// already filled a single-response form is refused.
pub fn check_view(
    form: &Form,
    identity: &Identity,
    has_filled: bool,
) -> Result<ViewAccess, FormError> {
    if form.require_login && identity.is_anonymous() {
        return Err(FormError::Unauthenticated(
            "Please login to continue".to_string(),
        ));
    }

    let access = can_view(form, identity);
    if !access.editable && form.single_response && has_filled {
        return Err(FormError::AlreadyFilled);
    }

    Ok(access)
}

/// Whether the form accepts submissions at `now`.
pub fn is_open(form: &Form, now: DateTime<Utc>) -> bool {
    if form.is_closed {
        return false;
    }
    match form.close_on {
        Some(close_on) => now <= close_on,
        None => true,
    }
}

/// Decide whether `identity` may submit a response now.
pub fn can_submit(
    form: &Form,
    identity: &Identity,
    has_filled: bool,
    now: DateTime<Utc>,
) -> Result<(), SubmitDenial> {
    if form.require_login && identity.is_anonymous() {
        return Err(SubmitDenial::LoginRequired);
    }
    if !is_open(form, now) {
        return Err(SubmitDenial::Closed);
    }
    if form.single_response && has_filled {
        return Err(SubmitDenial::AlreadyFilled);
    }
    Ok(())
}

pub fn can_mutate(form: &Form, identity: &Identity) -> bool {
    identity.is(&form.creator)
}

pub fn can_delete(form: &Form, identity: &Identity) -> bool {
    identity.is(&form.creator)
}

/// Export is allowed through either ownership or the bearer export secret.
pub fn can_export(form: &Form, identity: &Identity, token: Option<&str>) -> bool {
    let by_owner = identity.is(&form.creator);
    let by_token = token.is_some_and(|t| {
        !form.response_token.is_empty()
            && bool::from(t.as_bytes().ct_eq(form.export_secret().as_bytes()))
    });
    by_owner || by_token
}
