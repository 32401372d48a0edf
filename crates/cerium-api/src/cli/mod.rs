//! CLI command definitions for the `cerium` binary.

pub mod export;
pub mod forms;
pub mod token;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Form builder backend: forms, responses and exports.
#[derive(Parser)]
#[command(name = "cerium", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through the OpenTelemetry stdout exporter.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to the configured port).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },

    /// Sign a session token for a roll number.
    Token {
        /// Roll number to sign for.
        roll: String,
    },

    /// List the forms created by a user.
    #[command(alias = "ls")]
    Forms {
        /// Creator roll number.
        roll: String,
    },

    /// Export the responses of a form.
    Export {
        /// Form id.
        form_id: String,

        /// Export as this creator.
        #[arg(long, conflicts_with = "token")]
        creator: Option<String>,

        /// Export secret (response token followed by the form id).
        #[arg(long)]
        token: Option<String>,

        /// Output format: csv, array or raw.
        #[arg(short, long, default_value = "csv")]
        format: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
