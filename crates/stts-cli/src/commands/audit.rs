use stts_core::entities::AuditEntry;
use stts_core::enums::{AuditAction, EntityType};
use stts_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `stts audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entries = fetch(args, ctx, flags).await?;
    output(&entries, flags.format)
}

async fn fetch(
    args: &AuditArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<Vec<AuditEntry>> {
    let limit = effective_limit(None, flags.limit, 50);
    let filter = AuditFilter {
        entity_type: parse_opt_enum::<EntityType>(args.entity_type.as_deref(), "entity-type")?,
        entity_id: args.entity_id.clone(),
        action: parse_opt_enum::<AuditAction>(args.action.as_deref(), "action")?,
        actor_id: args.actor.clone(),
        limit: Some(limit),
    };

    ctx.service.query_audit(&filter).await.map_err(Into::into)
}
