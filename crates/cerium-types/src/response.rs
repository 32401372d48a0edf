use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::form::FormId;

/// Key under which the submission time is injected into `responses`.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Key under which the filler identity is injected into `responses`.
pub const FILLER_FIELD: &str = "filler";

/// Unique identifier for a submitted response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponseId(pub Uuid);

impl ResponseId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ResponseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single submission against a form. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse {
    pub id: ResponseId,
    pub form_id: FormId,
    /// Server-assigned submission time.
    pub timestamp: DateTime<Utc>,
    /// Filler roll number; only set when the form collects it.
    pub filler: Option<String>,
    /// Widget uid -> submitted value, plus the injected `timestamp`/`filler`.
    pub responses: Map<String, Value>,
}

/// Body of a response submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub responses: Map<String, Value>,
}

/// Shape requested for a response listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Stored response documents as JSON.
    #[default]
    Raw,
    /// Header row plus one row of strings per response.
    Array,
    /// The array table rendered as CSV.
    Csv,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Raw => write!(f, "raw"),
            ExportFormat::Array => write!(f, "array"),
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "raw" => Ok(ExportFormat::Raw),
            "array" => Ok(ExportFormat::Array),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("invalid export type: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_parse() {
        assert_eq!("".parse::<ExportFormat>().unwrap(), ExportFormat::Raw);
        assert_eq!("ARRAY".parse::<ExportFormat>().unwrap(), ExportFormat::Array);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_submit_response_defaults_to_empty_map() {
        let body: SubmitResponse = serde_json::from_str("{}").unwrap();
        assert!(body.responses.is_empty());
    }
}
