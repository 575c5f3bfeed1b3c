use serde::Serialize;
use stts_core::entities::User;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct WhoamiResponse {
    authenticated: bool,
    user_id: Option<String>,
    permissions: Vec<String>,
    account_type: Option<String>,
    user: Option<User>,
}

/// Handle `stts whoami`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(actor) = ctx.service.actor() else {
        return output(
            &WhoamiResponse {
                authenticated: false,
                user_id: None,
                permissions: Vec::new(),
                account_type: None,
                user: None,
            },
            flags.format,
        );
    };

    // Token callers need not have a stored account.
    let user = match ctx.service.get_user(&actor.user_id).await {
        Ok(user) => Some(user),
        Err(error) => {
            tracing::debug!(user_id = %actor.user_id, "no stored account for caller: {error}");
            None
        }
    };

    output(
        &WhoamiResponse {
            authenticated: true,
            user_id: Some(actor.user_id.clone()),
            permissions: actor.permissions.iter().cloned().collect(),
            account_type: user.as_ref().map(User::account_type_label),
            user,
        },
        flags.format,
    )
}
