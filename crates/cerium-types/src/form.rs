use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Widget prop carrying the human-readable question text used as the export
/// column label.
pub const QUESTION_PROP: &str = "question";

/// Latest year that older clients used as a "no closing date" placeholder.
///
/// A `close_on` falling in or before this year is treated as unset.
pub const UNSET_CLOSE_ON_MAX_YEAR: i32 = 2000;

/// Unique identifier for a form, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormId(pub Uuid);

impl FormId {
    /// Create a new FormId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create a FormId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for FormId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FormId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A stored multi-page questionnaire.
///
/// `response_token` is never serialized: it leaves the service only through
/// the create response and the creator's form listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    /// Display name, copied from the first page title.
    pub name: String,
    /// Roll number of the owner.
    pub creator: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    pub pages: Vec<Page>,
    pub require_login: bool,
    pub collect_email: bool,
    pub single_response: bool,
    pub is_closed: bool,
    /// Submissions are refused after this instant.
    pub close_on: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub response_token: String,
}

impl Form {
    /// Iterate every widget in page-then-widget order.
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.pages.iter().flat_map(|p| p.widgets.iter())
    }

    /// The bearer secret that grants export access: token followed by form id.
    pub fn export_secret(&self) -> String {
        format!("{}{}", self.response_token, self.id)
    }
}

/// A section in a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

/// A single control in a page.
///
/// `props` is an open bag interpreted by the frontend. The only key the
/// service relies on is [`QUESTION_PROP`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub props: Map<String, Value>,
}

impl Widget {
    /// The widget's question text, if present and non-blank.
    pub fn question(&self) -> Option<&str> {
        self.props
            .get(QUESTION_PROP)
            .and_then(Value::as_str)
            .filter(|q| !q.trim().is_empty())
    }
}

/// Body of a form create or update request.
///
/// Server-managed fields (`creator`, `name`, `timestamp`, tokens) sent by a
/// client are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormDraft {
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub require_login: bool,
    #[serde(default)]
    pub collect_email: bool,
    #[serde(default)]
    pub single_response: bool,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub close_on: Option<DateTime<Utc>>,
}

/// Map placeholder closing dates from older clients to "no closing date".
pub fn normalize_close_on(close_on: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    close_on.filter(|dt| dt.year() > UNSET_CLOSE_ON_MAX_YEAR)
}

/// A form as returned to a viewer, with the caller-specific edit flag.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    #[serde(flatten)]
    pub form: Form,
    pub can_edit: bool,
}

/// Result of creating a form: its id and the export token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedForm {
    pub id: FormId,
    pub token: String,
}

/// One row of the creator's form listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSummary {
    pub id: FormId,
    pub name: String,
    pub token: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn widget(props: Value) -> Widget {
        Widget {
            kind: "short_answer".to_string(),
            uid: String::new(),
            props: props.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_widget_question() {
        assert_eq!(widget(json!({"question": "Q1"})).question(), Some("Q1"));
        assert_eq!(widget(json!({"question": "   "})).question(), None);
        assert_eq!(widget(json!({"question": 4})).question(), None);
        assert_eq!(widget(json!({})).question(), None);
    }

    #[test]
    fn test_form_id_roundtrip_through_string() {
        let id = FormId::new();
        let parsed: FormId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<FormId>().is_err());
    }

    #[test]
    fn test_normalize_close_on_boundary() {
        let sentinel = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let end_of_2000 = Utc.with_ymd_and_hms(2000, 12, 31, 23, 59, 59).unwrap();
        let first_real = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(normalize_close_on(Some(sentinel)), None);
        assert_eq!(normalize_close_on(Some(end_of_2000)), None);
        assert_eq!(normalize_close_on(Some(first_real)), Some(first_real));
        assert_eq!(normalize_close_on(None), None);
    }

    #[test]
    fn test_draft_deserialize_ignores_server_fields() {
        let draft: FormDraft = serde_json::from_value(json!({
            "name": "ignored",
            "creator": "someone-else",
            "can_edit": true,
            "pages": [{"title": "T", "widgets": [{"type": "short_answer", "props": {"question": "Q1"}}]}],
            "single_response": true,
            "require_login": true
        }))
        .unwrap();

        assert_eq!(draft.pages.len(), 1);
        assert_eq!(draft.pages[0].widgets[0].uid, "");
        assert!(draft.single_response);
        assert!(draft.require_login);
        assert!(!draft.collect_email);
        assert!(draft.close_on.is_none());
    }

    #[test]
    fn test_form_serialization_hides_response_token() {
        let form = Form {
            id: FormId::new(),
            name: "T".to_string(),
            creator: "A".to_string(),
            timestamp: Utc::now(),
            pages: Vec::new(),
            require_login: false,
            collect_email: false,
            single_response: false,
            is_closed: false,
            close_on: None,
            response_token: "secret-token".to_string(),
        };

        let view = FormView { form, can_edit: true };
        let text = serde_json::to_string(&view).unwrap();
        assert!(!text.contains("secret-token"));
        assert!(text.contains("\"can_edit\":true"));
    }
}
