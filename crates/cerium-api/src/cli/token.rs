//! `cerium token`: sign a session credential offline.

use anyhow::Result;
use console::style;
use serde_json::json;

use crate::state::AppState;

pub fn issue_token(state: &AppState, roll: &str, json: bool) -> Result<()> {
    let session = state.login_service.issue_session(roll)?;

    if json {
        let out = json!({
            "roll_number": roll,
            "token": session.token,
            "expires_at": session.expires_at,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Session for {} (expires {})",
        style("✓").green().bold(),
        style(roll).cyan(),
        style(session.expires_at.format("%Y-%m-%d %H:%M UTC")).dim()
    );
    println!();
    println!("  {}", style(&session.token).yellow());
    println!();

    Ok(())
}
