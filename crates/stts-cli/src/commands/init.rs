use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::commands::shared::payload::emit_entity;
use crate::context::AppContext;

/// Handle `stts init`: create the schema and the first administrator.
pub async fn handle(args: &InitArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let result = ctx.service.bootstrap_admin(&args.username, &args.name).await;
    if let Ok(ref admin) = result {
        tracing::info!(user_id = %admin.id, "act as this administrator with --user or STTS_AUTH__USER_ID");
    }
    emit_entity(result, "Administrator created", flags)
}
