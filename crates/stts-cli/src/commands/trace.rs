use crate::cli::GlobalFlags;
use crate::cli::root_commands::TraceArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `stts trace`. Public: needs no caller.
pub async fn handle(args: &TraceArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let result = ctx.service.track_lot(&args.lot_number).await?;
    if result.is_empty() {
        tracing::warn!(lot_number = %result.lot_number, "no stock, label or lab record for this lot");
    }
    output(&result, flags.format)
}
