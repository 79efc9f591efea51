//! Command handlers. Each handler maps its arguments onto client calls
//! and routes the resulting value through the output layer.

pub mod account;
pub mod auth;
pub mod batch;
pub mod bookmarks;
pub mod collections;
pub mod tags;

use crate::credentials;
use crate::error::CliError;
use crate::output::{self, OutputFormat};
use raindrip_api::RaindropClient;
use serde_json::Value;

/// Per-invocation state shared by every handler.
pub struct CommandContext {
    pub dry_run: bool,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Authenticated client, or the not-logged-in error with its hint.
    pub fn client(&self) -> Result<RaindropClient, CliError> {
        let token = credentials::load().token.ok_or(CliError::NotLoggedIn)?;
        Ok(RaindropClient::new(token).with_dry_run(self.dry_run))
    }

    pub fn emit(&self, value: Value) -> Result<(), CliError> {
        output::emit(&value, self.format)
    }

    /// Output for mutating commands; under dry-run the payload is marked
    /// so callers can tell nothing was actually changed.
    pub fn emit_action(&self, value: Value) -> Result<(), CliError> {
        let value = match value {
            Value::Object(mut map) if self.dry_run => {
                map.insert("dry_run".into(), Value::Bool(true));
                Value::Object(map)
            }
            other => other,
        };
        output::emit(&value, self.format)
    }
}

/// Parse a comma-separated ID list like `12,34,56`. Rejecting bad input
/// here means no request is ever issued for a malformed batch.
pub fn parse_id_list(raw: &str) -> Result<Vec<i64>, CliError> {
    let ids: Vec<i64> = raw
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| CliError::Validation(format!("invalid ID {:?} in list", part.trim())))
        })
        .collect::<Result<_, _>>()?;
    if ids.is_empty() {
        return Err(CliError::Validation("empty ID list".into()));
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_ids() {
        assert_eq!(parse_id_list("1,2, 3").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let err = parse_id_list("1,abc,3").unwrap_err();
        assert!(err.to_string().contains("abc"));
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse_id_list("").is_err());
    }
}
