//! Output routing: every command produces a JSON value, which is rendered
//! in the selected format. Data goes to stdout; error payloads go to
//! stderr so piped output stays clean.

use crate::error::CliError;
use clap::ValueEnum;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Compact tabular text, the cheapest format for language models.
    Toon,
    /// Pretty-printed JSON.
    Json,
}

pub fn emit(value: &Value, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Toon => println!("{}", raindrip_toon::encode(value)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

/// Render an error as a structured payload in the active format.
pub fn emit_error(err: &CliError, format: OutputFormat) {
    let payload = json!({
        "error": err.to_string(),
        "status": err.status(),
        "hint": err.hint(),
    });
    let rendered = match format {
        OutputFormat::Toon => {
            raindrip_toon::encode(&payload).unwrap_or_else(|_| payload.to_string())
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
        }
    };
    eprintln!("{rendered}");
}
