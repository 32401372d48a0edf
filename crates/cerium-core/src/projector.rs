//! Response projector.
//!
//! Flattens a form's widget schema and its stored responses into a
//! fixed-column table: one header row of labels, then one row per response.
//! Column order comes from the form, never from the responses, so a
//! response missing a field produces an empty cell rather than shifting the
//! row.

use std::collections::HashMap;

use chrono::SecondsFormat;
use serde_json::Value;

use cerium_types::form::Form;
use cerium_types::response::{FILLER_FIELD, FormResponse, TIMESTAMP_FIELD};

/// Decimal places used for floating-point answers. Integers are rendered
/// exactly.
pub const NUMBER_PRECISION: usize = 0;

/// Ordered field keys plus the label for each key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub keys: Vec<String>,
    pub labels: HashMap<String, String>,
}

impl FieldSchema {
    /// Header row: labels in key order.
    pub fn header(&self) -> Vec<String> {
        self.keys
            .iter()
            .map(|k| self.labels.get(k).cloned().unwrap_or_default())
            .collect()
    }
}

/// Build the export schema for `form`.
///
/// `timestamp` always comes first, then `filler` when the form collects it,
/// then every widget uid in page-then-widget order. Widgets without a
/// question are skipped; forms are validated on save so this only affects
/// documents written before that check existed.
pub fn project_fields(form: &Form) -> FieldSchema {
    let mut keys = vec![TIMESTAMP_FIELD.to_string()];
    let mut labels = HashMap::from([(TIMESTAMP_FIELD.to_string(), "Timestamp".to_string())]);

    if form.collect_email {
        keys.push(FILLER_FIELD.to_string());
        labels.insert(FILLER_FIELD.to_string(), "Filler".to_string());
    }

    for widget in form.widgets() {
        let Some(question) = widget.question() else {
            tracing::warn!(form_id = %form.id, uid = %widget.uid, "widget without question left out of export");
            continue;
        };
        keys.push(widget.uid.clone());
        labels.insert(widget.uid.clone(), question.to_string());
    }

    FieldSchema { keys, labels }
}

/// Build the export table: header row followed by one row per response,
/// in the order supplied.
pub fn project_rows(form: &Form, responses: &[FormResponse]) -> Vec<Vec<String>> {
    let schema = project_fields(form);

    let mut table = Vec::with_capacity(responses.len() + 1);
    table.push(schema.header());
    for response in responses {
        table.push(
            schema
                .keys
                .iter()
                .map(|key| render_cell(response, key))
                .collect(),
        );
    }
    table
}

fn render_cell(response: &FormResponse, key: &str) -> String {
    if key == TIMESTAMP_FIELD {
        return response
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Secs, true);
    }
    match response.responses.get(key) {
        None => String::new(),
        Some(value) => render_value(value),
    }
}

/// Default string form of a submitted value.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) => format!("{:.*}", NUMBER_PRECISION, f),
            None => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}
