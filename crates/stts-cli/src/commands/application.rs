use stts_core::enums::{ApplicationForm, ReviewStatus};
use stts_db::updates::application::ApplicationUpdateBuilder;
use stts_db::workflow::summarize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ApplicationCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_date, parse_enum, parse_json, parse_opt_date, parse_opt_enum};
use crate::commands::shared::payload::{emit_basic, emit_entity};
use crate::context::AppContext;
use crate::output::output;

/// Handle `stts application`.
pub async fn handle(
    action: &ApplicationCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        ApplicationCommands::Create {
            form,
            details,
            valid_until,
        } => {
            let form = parse_enum::<ApplicationForm>(form, "form")?;
            let details = parse_json(details, "details")?;
            let valid_until = parse_opt_date(valid_until.as_deref(), "valid until")?;
            emit_entity(
                svc.create_application(form, details, valid_until).await,
                "Application submitted",
                flags,
            )
        }
        ApplicationCommands::Get { id } => output(&svc.get_application(id).await?, flags.format),
        ApplicationCommands::List {
            form,
            status,
            limit,
        } => {
            let form = parse_opt_enum::<ApplicationForm>(form.as_deref(), "form")?;
            let status = parse_opt_enum::<ReviewStatus>(status.as_deref(), "status")?;
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            output(&svc.list_applications(form, status, limit).await?, flags.format)
        }
        ApplicationCommands::Update {
            id,
            details,
            valid_until,
            clear_valid_until,
        } => {
            let mut builder = ApplicationUpdateBuilder::new();
            if let Some(details) = details {
                builder = builder.details(parse_json(details, "details")?);
            }
            if *clear_valid_until {
                builder = builder.valid_until(None);
            } else if let Some(raw) = valid_until {
                builder = builder.valid_until(Some(parse_date(raw, "valid until")?));
            }
            emit_entity(
                svc.update_application(id, builder.build()).await,
                "Application updated",
                flags,
            )
        }
        ApplicationCommands::Delete { id } => emit_basic(
            svc.delete_application(id).await,
            |()| format!("Application {id} deleted"),
            flags,
        ),
        ApplicationCommands::Assign(args) => emit_basic(
            svc.assign_application_inspector(&args.ids, &args.inspector, args.comment.as_deref())
                .await,
            |changes| summarize(changes),
            flags,
        ),
        ApplicationCommands::Approve(args) => emit_basic(
            svc.approve_application(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
        ApplicationCommands::Reject(args) => emit_basic(
            svc.reject_application(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
        ApplicationCommands::Halt(args) => emit_basic(
            svc.halt_application(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
    }
}
