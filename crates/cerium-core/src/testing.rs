//! In-memory port implementations and fixtures shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};

use cerium_types::error::{ProviderError, RepositoryError, SessionError};
use cerium_types::form::{Form, FormDraft, FormId, FormSummary, Page, Widget};
use cerium_types::identity::{SessionClaims, UserProfile};
use cerium_types::response::{FormResponse, ResponseId};

use crate::auth::provider::IdentityProvider;
use crate::auth::session::SessionCodec;
use crate::repository::filler::{FillerRepository, MarkerOutcome};
use crate::repository::form::FormRepository;
use crate::repository::response::ResponseRepository;
use crate::repository::user::UserRepository;
use crate::service::token::TokenGenerator;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn draft_widget(uid: &str, question: Option<&str>) -> Widget {
    let mut props = Map::new();
    if let Some(q) = question {
        props.insert("question".to_string(), json!(q));
    }
    Widget {
        kind: "short_answer".to_string(),
        uid: uid.to_string(),
        props,
    }
}

/// Single-page draft titled `title` with `(uid, question)` widgets.
pub fn draft(title: &str, widgets: &[(&str, &str)]) -> FormDraft {
    FormDraft {
        pages: vec![Page {
            title: title.to_string(),
            description: String::new(),
            widgets: widgets
                .iter()
                .map(|(uid, q)| draft_widget(uid, Some(q)))
                .collect(),
        }],
        ..FormDraft::default()
    }
}

/// A stored form owned by "owner" with the given `(uid, question)` pages.
pub fn form_with_pages(pages: &[&[(&str, &str)]]) -> Form {
    let mut form = sample_form("owner");
    form.pages = pages
        .iter()
        .enumerate()
        .map(|(i, widgets)| Page {
            title: format!("Page {}", i + 1),
            description: String::new(),
            widgets: widgets
                .iter()
                .map(|(uid, q)| draft_widget(uid, Some(q)))
                .collect(),
        })
        .collect();
    form
}

pub fn sample_form(creator: &str) -> Form {
    Form {
        id: FormId::new(),
        name: "Sample".to_string(),
        creator: creator.to_string(),
        timestamp: Utc::now(),
        pages: vec![Page {
            title: "Sample".to_string(),
            description: String::new(),
            widgets: vec![draft_widget("w1", Some("Q1"))],
        }],
        require_login: false,
        collect_email: false,
        single_response: false,
        is_closed: false,
        close_on: None,
        response_token: "tok3nTOK3N".to_string(),
    }
}

pub fn response_for(form: &Form, at: DateTime<Utc>, responses: Value) -> FormResponse {
    FormResponse {
        id: ResponseId::new(),
        form_id: form.id.clone(),
        timestamp: at,
        filler: None,
        responses: responses.as_object().cloned().unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Session codec
// ---------------------------------------------------------------------------

/// Codec whose tokens are readable strings.
///
/// `sign` yields `valid:<roll>`. `verify` accepts `valid:<roll>` and maps
/// `expired:*`, `forged:*` and anything else to the matching error.
#[derive(Default)]
pub struct StaticCodec;

impl SessionCodec for StaticCodec {
    fn sign(&self, claims: &SessionClaims) -> Result<String, SessionError> {
        Ok(format!("valid:{}", claims.roll_number))
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        match token.split_once(':') {
            Some(("valid", roll)) => Ok(SessionClaims {
                roll_number: roll.to_string(),
                exp: i64::MAX,
            }),
            Some(("expired", _)) => Err(SessionError::Expired),
            Some(("forged", _)) => Err(SessionError::BadSignature),
            _ => Err(SessionError::Malformed(token.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryForms {
    forms: Mutex<Vec<Form>>,
}

impl MemoryForms {
    pub fn get(&self, id: &FormId) -> Option<Form> {
        self.forms.lock().unwrap().iter().find(|f| &f.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.forms.lock().unwrap().len()
    }
}

impl FormRepository for MemoryForms {
    async fn create(&self, form: &Form) -> Result<(), RepositoryError> {
        self.forms.lock().unwrap().push(form.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &FormId) -> Result<Option<Form>, RepositoryError> {
        Ok(self.get(id))
    }

    async fn find_owned(&self, id: &FormId, creator: &str) -> Result<Option<Form>, RepositoryError> {
        Ok(self.get(id).filter(|f| f.creator == creator))
    }

    async fn replace_owned(
        &self,
        id: &FormId,
        creator: &str,
        form: &Form,
    ) -> Result<bool, RepositoryError> {
        let mut forms = self.forms.lock().unwrap();
        let Some(stored) = forms.iter_mut().find(|f| &f.id == id && f.creator == creator) else {
            return Ok(false);
        };
        stored.name = form.name.clone();
        stored.pages = form.pages.clone();
        stored.require_login = form.require_login;
        stored.collect_email = form.collect_email;
        stored.single_response = form.single_response;
        stored.is_closed = form.is_closed;
        stored.close_on = form.close_on;
        Ok(true)
    }

    async fn delete(&self, id: &FormId) -> Result<(), RepositoryError> {
        let mut forms = self.forms.lock().unwrap();
        let before = forms.len();
        forms.retain(|f| &f.id != id);
        if forms.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_by_creator(&self, creator: &str) -> Result<Vec<FormSummary>, RepositoryError> {
        let forms = self.forms.lock().unwrap();
        let mut mine: Vec<FormSummary> = forms
            .iter()
            .rev()
            .filter(|f| f.creator == creator)
            .map(|f| FormSummary {
                id: f.id.clone(),
                name: f.name.clone(),
                token: f.response_token.clone(),
                timestamp: f.timestamp,
            })
            .collect();
        mine.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(mine)
    }
}

#[derive(Default)]
pub struct MemoryResponses {
    responses: Mutex<Vec<FormResponse>>,
    fail_deletes: AtomicBool,
}

impl MemoryResponses {
    pub fn insert(&self, response: FormResponse) {
        self.responses.lock().unwrap().push(response);
    }

    pub fn count_for(&self, form_id: &FormId) -> usize {
        self.responses
            .lock()
            .unwrap()
            .iter()
            .filter(|r| &r.form_id == form_id)
            .count()
    }

    /// Make every later `delete_for_form` fail.
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }
}

impl ResponseRepository for MemoryResponses {
    async fn create(&self, response: &FormResponse) -> Result<(), RepositoryError> {
        self.insert(response.clone());
        Ok(())
    }

    async fn list_for_form(&self, form_id: &FormId) -> Result<Vec<FormResponse>, RepositoryError> {
        Ok(self
            .responses
            .lock()
            .unwrap()
            .iter()
            .filter(|r| &r.form_id == form_id)
            .cloned()
            .collect())
    }

    async fn delete_for_form(&self, form_id: &FormId) -> Result<u64, RepositoryError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        let mut responses = self.responses.lock().unwrap();
        let before = responses.len();
        responses.retain(|r| &r.form_id != form_id);
        Ok((before - responses.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryFillers {
    markers: Mutex<HashSet<(FormId, String)>>,
}

impl MemoryFillers {
    pub fn len(&self) -> usize {
        self.markers.lock().unwrap().len()
    }
}

impl FillerRepository for MemoryFillers {
    async fn has_filled(&self, form_id: &FormId, filler: &str) -> Result<bool, RepositoryError> {
        Ok(self
            .markers
            .lock()
            .unwrap()
            .contains(&(form_id.clone(), filler.to_string())))
    }

    async fn record(&self, form_id: &FormId, filler: &str) -> Result<MarkerOutcome, RepositoryError> {
        let inserted = self
            .markers
            .lock()
            .unwrap()
            .insert((form_id.clone(), filler.to_string()));
        Ok(if inserted {
            MarkerOutcome::Recorded
        } else {
            MarkerOutcome::AlreadyRecorded
        })
    }

    async fn delete_for_form(&self, form_id: &FormId) -> Result<u64, RepositoryError> {
        let mut markers = self.markers.lock().unwrap();
        let before = markers.len();
        markers.retain(|(id, _)| id != form_id);
        Ok((before - markers.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<HashMap<String, UserProfile>>,
}

impl MemoryUsers {
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

impl UserRepository for MemoryUsers {
    async fn upsert(&self, profile: &UserProfile) -> Result<(), RepositoryError> {
        self.users
            .lock()
            .unwrap()
            .insert(profile.roll_number.clone(), profile.clone());
        Ok(())
    }

    async fn get(&self, roll_number: &str) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self.users.lock().unwrap().get(roll_number).cloned())
    }
}

// ---------------------------------------------------------------------------
// Identity provider
// ---------------------------------------------------------------------------

/// Provider accepting a single authorization code.
pub struct FakeProvider {
    code: String,
    profile: Option<UserProfile>,
}

impl FakeProvider {
    pub fn with_profile(code: &str, roll_number: &str) -> Self {
        Self {
            code: code.to_string(),
            profile: Some(UserProfile {
                id: 1,
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                roll_number: roll_number.to_string(),
                profile_picture: String::new(),
                email: format!("{roll_number}@example.com"),
            }),
        }
    }

    /// Accepts `code` but fails the profile fetch.
    pub fn failing_profile(code: &str) -> Self {
        Self {
            code: code.to_string(),
            profile: None,
        }
    }
}

impl IdentityProvider for FakeProvider {
    async fn exchange_code(&self, code: &str, _redirect_uri: &str) -> Result<String, ProviderError> {
        if code == self.code {
            Ok(format!("access-{code}"))
        } else {
            Err(ProviderError::Status(400))
        }
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, ProviderError> {
        if access_token != format!("access-{}", self.code) {
            return Err(ProviderError::Status(401));
        }
        self.profile
            .clone()
            .ok_or_else(|| ProviderError::Decode("empty body".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Deterministic generator producing `token-N` / `uid-N`.
#[derive(Default)]
pub struct SeqTokens {
    next: AtomicUsize,
}

impl TokenGenerator for SeqTokens {
    fn response_token(&self) -> String {
        format!("token-{}", self.next.fetch_add(1, Ordering::SeqCst))
    }

    fn widget_uid(&self) -> String {
        format!("uid-{}", self.next.fetch_add(1, Ordering::SeqCst))
    }
}
