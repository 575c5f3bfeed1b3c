use stts_core::permissions::Permission;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RoleCommands;
use crate::commands::shared::payload::{emit_basic, emit_entity};
use crate::context::AppContext;
use crate::output::output;

/// Handle `stts role`.
pub async fn handle(
    action: &RoleCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        RoleCommands::Create { name, permissions } => {
            warn_unknown(permissions);
            emit_entity(
                ctx.service.create_role(name, permissions).await,
                "Role created",
                flags,
            )
        }
        RoleCommands::Get { id } => output(&ctx.service.get_role(id).await?, flags.format),
        RoleCommands::List => output(&ctx.service.list_roles().await?, flags.format),
        RoleCommands::SetPermissions { id, permissions } => {
            warn_unknown(permissions);
            emit_entity(
                ctx.service.set_role_permissions(id, permissions).await,
                "Role permissions replaced",
                flags,
            )
        }
        RoleCommands::Delete { id } => emit_basic(
            ctx.service.delete_role(id).await,
            |()| format!("Role {id} deleted"),
            flags,
        ),
    }
}

/// Unknown names are stored but never grant anything.
fn warn_unknown(permissions: &[String]) {
    for name in unknown_permissions(permissions) {
        tracing::warn!(permission = %name, "not a known permission; it will never match");
    }
}

fn unknown_permissions(permissions: &[String]) -> Vec<&str> {
    permissions
        .iter()
        .map(String::as_str)
        .filter(|name| Permission::from_name(name).is_none())
        .collect()
}
