use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use stts_config::SttsConfig;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TokenCommands;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DecodedToken {
    user_id: String,
    expires_at: DateTime<Utc>,
    near_expiry: bool,
    permissions: BTreeMap<String, bool>,
}

/// Handle `stts token`. Never opens the database.
pub fn handle(action: &TokenCommands, config: &SttsConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        TokenCommands::Decode { bearer } => {
            let token = pick_token(bearer.as_deref(), config, flags)?;
            let claims = stts_auth::claims_from_token(&token)?;
            output(
                &DecodedToken {
                    near_expiry: claims.is_near_expiry(config.auth.expiry_buffer_secs),
                    user_id: claims.user_id,
                    expires_at: claims.expires_at,
                    permissions: claims.permissions,
                },
                flags.format,
            )
        }
        TokenCommands::Permissions { bearer } => {
            let token = pick_token(bearer.as_deref(), config, flags)?;
            output(&stts_auth::permissions_from_token(&token), flags.format)
        }
    }
}

/// Positional token, then `--token`, then `auth.token` from configuration.
fn pick_token(
    positional: Option<&str>,
    config: &SttsConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<String> {
    positional
        .map(str::to_string)
        .or_else(|| flags.token.clone())
        .or_else(|| config.auth.has_token().then(|| config.auth.token.clone()))
        .ok_or_else(|| anyhow::anyhow!("no token given; pass one or set STTS_AUTH__TOKEN"))
}
