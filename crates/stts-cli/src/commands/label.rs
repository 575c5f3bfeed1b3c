use stts_core::enums::LabelStatus;
use stts_db::updates::lab::SeedLabelUpdate;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::LabelCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_opt_enum;
use crate::commands::shared::payload::{emit_basic, emit_entity};
use crate::context::AppContext;
use crate::output::output;

/// Handle `stts label`.
pub async fn handle(
    action: &LabelCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        LabelCommands::Create { lab, quantity } => emit_entity(
            svc.create_seed_label(lab, *quantity).await,
            "Label request submitted",
            flags,
        ),
        LabelCommands::Get { id } => output(&svc.get_seed_label(id).await?, flags.format),
        LabelCommands::List { status, lot, limit } => {
            let status = parse_opt_enum::<LabelStatus>(status.as_deref(), "status")?;
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            output(
                &svc.list_seed_labels(status, lot.as_deref(), limit).await?,
                flags.format,
            )
        }
        LabelCommands::Update { id, quantity } => {
            let update = SeedLabelUpdate {
                quantity: Some(*quantity),
            };
            emit_entity(svc.update_seed_label(id, update).await, "Label request updated", flags)
        }
        LabelCommands::Delete { id } => emit_basic(
            svc.delete_seed_label(id).await,
            |()| format!("Label request {id} deleted"),
            flags,
        ),
        LabelCommands::Approve(args) => emit_basic(
            svc.approve_seed_label(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
        LabelCommands::Reject(args) => emit_basic(
            svc.reject_seed_label(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
        LabelCommands::Print { id } => emit_basic(
            svc.print_seed_label(id).await,
            |change| change.message(),
            flags,
        ),
    }
}
