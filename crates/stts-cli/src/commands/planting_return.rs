use stts_core::enums::{Decision, InspectionStatus, SeedClass};
use stts_db::repos::planting_return::NewPlantingReturn;
use stts_db::updates::planting_return::PlantingReturnUpdateBuilder;
use stts_db::workflow::summarize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ReturnCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_date, parse_enum, parse_opt_date, parse_opt_enum, parse_opt_json};
use crate::commands::shared::payload::{emit_basic, emit_entity};
use crate::context::AppContext;
use crate::output::output;

/// Handle `stts return`.
pub async fn handle(
    action: &ReturnCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        ReturnCommands::Create {
            variety,
            seed_class,
            location,
            area,
            quantity,
            date_planted,
            lot,
        } => {
            let new = NewPlantingReturn {
                crop_variety_id: variety.clone(),
                seed_class: parse_enum::<SeedClass>(seed_class, "seed class")?,
                location: location.clone(),
                area_planted: *area,
                quantity_planted: *quantity,
                date_planted: parse_opt_date(date_planted.as_deref(), "date planted")?,
                lot_number: lot.clone(),
            };
            emit_entity(svc.create_planting_return(new).await, "Planting return filed", flags)
        }
        ReturnCommands::Get { id } => output(&svc.get_planting_return(id).await?, flags.format),
        ReturnCommands::List {
            status,
            inspector,
            limit,
        } => {
            let status = parse_opt_enum::<InspectionStatus>(status.as_deref(), "status")?;
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            output(
                &svc.list_planting_returns(status, inspector.as_deref(), limit).await?,
                flags.format,
            )
        }
        ReturnCommands::Update {
            id,
            location,
            area,
            quantity,
            date_planted,
            lot,
        } => {
            let mut builder = PlantingReturnUpdateBuilder::new();
            if let Some(location) = location {
                builder = builder.location(location);
            }
            if let Some(area) = area {
                builder = builder.area_planted(*area);
            }
            if let Some(quantity) = quantity {
                builder = builder.quantity_planted(*quantity);
            }
            if let Some(raw) = date_planted {
                builder = builder.date_planted(Some(parse_date(raw, "date planted")?));
            }
            if let Some(lot) = lot {
                builder = builder.lot_number((!lot.is_empty()).then(|| lot.clone()));
            }
            emit_entity(
                svc.update_planting_return(id, builder.build()).await,
                "Planting return updated",
                flags,
            )
        }
        ReturnCommands::Delete { id } => emit_basic(
            svc.delete_planting_return(id).await,
            |()| format!("Planting return {id} deleted"),
            flags,
        ),
        ReturnCommands::Assign(args) => emit_basic(
            svc.assign_planting_return_inspector(&args.ids, &args.inspector, args.comment.as_deref())
                .await,
            |changes| summarize(changes),
            flags,
        ),
        ReturnCommands::SubmitStage {
            id,
            stage,
            decision,
            report,
            comment,
        } => {
            let decision = parse_enum::<Decision>(decision, "decision")?;
            let report = parse_opt_json(report.as_deref(), "report")?;
            emit_basic(
                svc.submit_planting_return_stage(id, stage, decision, report, comment.as_deref())
                    .await,
                |submission| submission.message(),
                flags,
            )
        }
        ReturnCommands::Approve(args) => emit_basic(
            svc.approve_planting_return(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
        ReturnCommands::Reject(args) => emit_basic(
            svc.reject_planting_return(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
        ReturnCommands::Halt(args) => emit_basic(
            svc.halt_planting_return(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
    }
}
