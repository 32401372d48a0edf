//! `cerium forms`: list a creator's forms.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use cerium_types::form::FormSummary;
use cerium_types::identity::Identity;

use crate::state::AppState;

pub async fn list_forms(state: &AppState, roll: &str, json: bool) -> Result<()> {
    let forms = state
        .form_service
        .list_forms(&Identity::user(roll))
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&forms)?);
        return Ok(());
    }

    if forms.is_empty() {
        println!();
        println!(
            "  {} No forms found for {}",
            style("i").blue().bold(),
            style(roll).yellow()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("{}", forms_table(&forms));
    println!();
    println!(
        "  {} form{}",
        style(forms.len()).bold(),
        if forms.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

fn forms_table(forms: &[FormSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Id").fg(Color::White),
        Cell::new("Export Token").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for form in forms {
        table.add_row(vec![
            Cell::new(&form.name).fg(Color::Cyan),
            Cell::new(form.id.to_string()).fg(Color::White),
            Cell::new(&form.token),
            Cell::new(form.timestamp.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
        ]);
    }
    table
}
