use stts_db::repos::user::NewUser;
use stts_db::updates::user::UserUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{AccountFlags, UserCommands};
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::payload::{emit_basic, emit_entity};
use crate::context::AppContext;
use crate::output::output;

/// Handle `stts user`.
pub async fn handle(
    action: &UserCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        UserCommands::Create {
            username,
            name,
            email,
            flags: account,
        } => {
            let new = NewUser {
                username: username.clone(),
                name: name.clone(),
                email: email.clone(),
                is_merchant: account.merchant.unwrap_or(false),
                is_grower: account.grower.unwrap_or(false),
                is_qds_producer: account.qds_producer.unwrap_or(false),
                is_inspector: account.inspector.unwrap_or(false),
                is_admin: account.admin.unwrap_or(false),
            };
            emit_entity(ctx.service.create_user(new).await, "User created", flags)
        }
        UserCommands::Get { id } => output(&ctx.service.get_user(id).await?, flags.format),
        UserCommands::List { inspectors, limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            output(&ctx.service.list_users(*inspectors, limit).await?, flags.format)
        }
        UserCommands::Update {
            id,
            name,
            email,
            flags: account,
        } => {
            let mut builder = UserUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(email) = email {
                builder = builder.email((!email.is_empty()).then(|| email.clone()));
            }
            let update = apply_account_flags(builder, account).build();
            emit_entity(ctx.service.update_user(id, update).await, "User updated", flags)
        }
        UserCommands::Delete { id } => emit_basic(
            ctx.service.delete_user(id).await,
            |()| format!("User {id} deleted"),
            flags,
        ),
        UserCommands::Grant { user_id, role } => emit_entity(
            ctx.service.grant_role(user_id, role).await,
            "Role granted",
            flags,
        ),
        UserCommands::Revoke { user_id, role } => emit_entity(
            ctx.service.revoke_role(user_id, role).await,
            "Role revoked",
            flags,
        ),
    }
}

fn apply_account_flags(mut builder: UserUpdateBuilder, account: &AccountFlags) -> UserUpdateBuilder {
    if let Some(flag) = account.merchant {
        builder = builder.is_merchant(flag);
    }
    if let Some(flag) = account.grower {
        builder = builder.is_grower(flag);
    }
    if let Some(flag) = account.qds_producer {
        builder = builder.is_qds_producer(flag);
    }
    if let Some(flag) = account.inspector {
        builder = builder.is_inspector(flag);
    }
    if let Some(flag) = account.admin {
        builder = builder.is_admin(flag);
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_given_flags_are_updated() {
        let account = AccountFlags {
            inspector: Some(true),
            merchant: Some(false),
            ..Default::default()
        };
        let update = apply_account_flags(UserUpdateBuilder::new(), &account).build();
        assert_eq!(update.is_inspector, Some(true));
        assert_eq!(update.is_merchant, Some(false));
        assert_eq!(update.is_admin, None);
        assert_eq!(update.name, None);
    }
}
