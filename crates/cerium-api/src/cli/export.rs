//! `cerium export`: dump a form's responses.
//!
//! Access is checked exactly as over HTTP: either the creator's roll number
//! or the export secret is required.

use anyhow::{Context, Result};

use cerium_types::form::FormId;
use cerium_types::identity::Identity;
use cerium_types::response::ExportFormat;

use crate::export::to_csv;
use crate::state::AppState;

pub async fn export_responses(
    state: &AppState,
    form_id: &str,
    creator: Option<String>,
    token: Option<String>,
    format: &str,
) -> Result<()> {
    let form_id: FormId = form_id
        .parse()
        .with_context(|| format!("invalid form id '{form_id}'"))?;
    let format: ExportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let identity = match creator {
        Some(roll) => Identity::user(roll),
        None => Identity::Anonymous,
    };

    let service = &state.response_service;
    match format {
        ExportFormat::Raw => {
            let responses = service
                .list_responses(&identity, &form_id, token.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&responses)?);
        }
        ExportFormat::Array => {
            let table = service
                .export_table(&identity, &form_id, token.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        ExportFormat::Csv => {
            let table = service
                .export_table(&identity, &form_id, token.as_deref())
                .await?;
            print!("{}", to_csv(&table)?);
        }
    }

    tracing::debug!(%form_id, %format, "exported responses");
    Ok(())
}
