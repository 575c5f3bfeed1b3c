use stts_core::enums::{PermitType, ReviewStatus};
use stts_db::updates::permit::{PermitItemInput, PermitUpdateBuilder};
use stts_db::workflow::summarize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PermitCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_enum, parse_opt_enum, parse_permit_item};
use crate::commands::shared::payload::{emit_basic, emit_entity};
use crate::context::AppContext;
use crate::output::output;

/// Handle `stts permit`.
pub async fn handle(
    action: &PermitCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        PermitCommands::Create {
            permit_type,
            country,
            purpose,
            items,
        } => {
            let permit_type = parse_enum::<PermitType>(permit_type, "permit type")?;
            let items = parse_items(items)?;
            emit_entity(
                svc.create_permit(permit_type, country, purpose.as_deref(), &items)
                    .await,
                "Permit submitted",
                flags,
            )
        }
        PermitCommands::Get { id } => output(&svc.get_permit(id).await?, flags.format),
        PermitCommands::List {
            permit_type,
            status,
            limit,
        } => {
            let permit_type = parse_opt_enum::<PermitType>(permit_type.as_deref(), "permit type")?;
            let status = parse_opt_enum::<ReviewStatus>(status.as_deref(), "status")?;
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            output(&svc.list_permits(permit_type, status, limit).await?, flags.format)
        }
        PermitCommands::Update {
            id,
            country,
            purpose,
            items,
        } => {
            let mut builder = PermitUpdateBuilder::new();
            if let Some(country) = country {
                builder = builder.country(country);
            }
            if let Some(purpose) = purpose {
                builder = builder.purpose((!purpose.is_empty()).then(|| purpose.clone()));
            }
            if !items.is_empty() {
                builder = builder.items(parse_items(items)?);
            }
            emit_entity(
                svc.update_permit(id, builder.build()).await,
                "Permit updated",
                flags,
            )
        }
        PermitCommands::Delete { id } => emit_basic(
            svc.delete_permit(id).await,
            |()| format!("Permit {id} deleted"),
            flags,
        ),
        PermitCommands::Assign(args) => emit_basic(
            svc.assign_permit_inspector(&args.ids, &args.inspector, args.comment.as_deref())
                .await,
            |changes| summarize(changes),
            flags,
        ),
        PermitCommands::Approve(args) => emit_basic(
            svc.approve_permit(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
        PermitCommands::Reject(args) => emit_basic(
            svc.reject_permit(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
        PermitCommands::Halt(args) => emit_basic(
            svc.halt_permit(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
    }
}

fn parse_items(raw: &[String]) -> anyhow::Result<Vec<PermitItemInput>> {
    raw.iter().map(|item| parse_permit_item(item)).collect()
}
