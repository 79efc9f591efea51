//! Login, logout, and identity commands.

use super::CommandContext;
use crate::credentials::{self, Config};
use crate::error::CliError;
use raindrip_api::RaindropClient;
use serde_json::json;
use std::io::{self, BufRead, Write};

/// Verify the token against `/user` before persisting it; a bad token
/// never reaches disk.
pub fn login(ctx: &CommandContext, token: Option<String>) -> Result<(), CliError> {
    let token = match token {
        Some(token) => token,
        None => prompt_token()?,
    };
    let client = RaindropClient::new(token.clone());
    let user = client.get_user()?;
    credentials::save(&Config { token: Some(token) })?;
    ctx.emit(json!({
        "logged_in": true,
        "user": {"id": user.id, "name": user.full_name},
    }))
}

pub fn logout(ctx: &CommandContext) -> Result<(), CliError> {
    credentials::delete()?;
    ctx.emit(json!({"logged_out": true}))
}

pub fn whoami(ctx: &CommandContext) -> Result<(), CliError> {
    let user = ctx.client()?.get_user()?;
    ctx.emit(serde_json::to_value(user)?)
}

fn prompt_token() -> Result<String, CliError> {
    eprint!("Enter your Raindrop.io API token: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let token = line.trim().to_string();
    if token.is_empty() {
        return Err(CliError::Validation("no token provided".into()));
    }
    Ok(token)
}
