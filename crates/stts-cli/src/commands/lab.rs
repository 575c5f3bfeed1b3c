use stts_core::enums::{Decision, LabStatus};
use stts_db::repos::lab::NewLabInspection;
use stts_db::updates::lab::LabInspectionUpdate;
use stts_db::workflow::summarize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::LabCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_enum, parse_opt_enum, parse_opt_json};
use crate::commands::shared::payload::{emit_basic, emit_entity};
use crate::context::AppContext;
use crate::output::output;

/// Handle `stts lab`.
pub async fn handle(
    action: &LabCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        LabCommands::Create {
            lot,
            mother_lot,
            variety,
            quantity,
        } => {
            let new = NewLabInspection {
                lot_number: lot.clone(),
                mother_lot: mother_lot.clone(),
                crop_variety_id: variety.clone(),
                quantity: *quantity,
            };
            emit_entity(svc.create_lab_inspection(new).await, "Lab request submitted", flags)
        }
        LabCommands::Get { id } => output(&svc.get_lab_inspection(id).await?, flags.format),
        LabCommands::List { status, lot, limit } => {
            let status = parse_opt_enum::<LabStatus>(status.as_deref(), "status")?;
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            output(
                &svc.list_lab_inspections(status, lot.as_deref(), limit).await?,
                flags.format,
            )
        }
        LabCommands::Update {
            id,
            lot,
            mother_lot,
            quantity,
        } => {
            let update = LabInspectionUpdate {
                lot_number: lot.clone(),
                mother_lot: mother_lot
                    .as_ref()
                    .map(|m| (!m.is_empty()).then(|| m.clone())),
                quantity: *quantity,
            };
            emit_entity(svc.update_lab_inspection(id, update).await, "Lab request updated", flags)
        }
        LabCommands::Delete { id } => emit_basic(
            svc.delete_lab_inspection(id).await,
            |()| format!("Lab request {id} deleted"),
            flags,
        ),
        LabCommands::Assign(args) => emit_basic(
            svc.assign_lab_inspector(&args.ids, &args.inspector, args.comment.as_deref())
                .await,
            |changes| summarize(changes),
            flags,
        ),
        LabCommands::Submit { id, report, comment } => {
            let report = parse_opt_json(report.as_deref(), "report")?;
            emit_basic(
                svc.submit_lab_inspection(id, report, comment.as_deref()).await,
                |change| change.message(),
                flags,
            )
        }
        LabCommands::Approve(args) => emit_basic(
            svc.approve_lab_inspection(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
        LabCommands::Reject(args) => emit_basic(
            svc.reject_lab_inspection(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
        LabCommands::Receive(args) => emit_basic(
            svc.receive_lab_sample(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
        LabCommands::Result {
            id,
            decision,
            results,
            comment,
        } => {
            let decision = parse_enum::<Decision>(decision, "decision")?;
            let results = parse_opt_json(results.as_deref(), "results")?;
            emit_basic(
                svc.record_lab_result(id, decision, results, comment.as_deref())
                    .await,
                |change| change.message(),
                flags,
            )
        }
    }
}
