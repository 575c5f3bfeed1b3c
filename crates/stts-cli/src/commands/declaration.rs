use stts_core::enums::InspectionStatus;
use stts_db::repos::declaration::NewDeclaration;
use stts_db::updates::declaration::DeclarationUpdate;
use stts_db::workflow::summarize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DeclarationCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_opt_enum;
use crate::commands::shared::payload::{emit_basic, emit_entity};
use crate::context::AppContext;
use crate::output::output;

/// Handle `stts declaration`.
pub async fn handle(
    action: &DeclarationCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        DeclarationCommands::Create {
            source_of_seed,
            field_size,
            seed_quantity,
            varieties,
        } => {
            let new = NewDeclaration {
                source_of_seed: source_of_seed.clone(),
                field_size: *field_size,
                seed_quantity: *seed_quantity,
                crop_variety_ids: varieties.clone(),
            };
            emit_entity(svc.create_declaration(new).await, "Crop declaration submitted", flags)
        }
        DeclarationCommands::Get { id } => output(&svc.get_declaration(id).await?, flags.format),
        DeclarationCommands::List { status, limit } => {
            let status = parse_opt_enum::<InspectionStatus>(status.as_deref(), "status")?;
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            output(&svc.list_declarations(status, limit).await?, flags.format)
        }
        DeclarationCommands::Update {
            id,
            source_of_seed,
            field_size,
            seed_quantity,
            varieties,
        } => {
            let update = DeclarationUpdate {
                source_of_seed: source_of_seed.clone().map(Some),
                field_size: field_size.map(Some),
                seed_quantity: seed_quantity.map(Some),
                crop_variety_ids: (!varieties.is_empty()).then(|| varieties.clone()),
            };
            emit_entity(
                svc.update_declaration(id, update).await,
                "Crop declaration updated",
                flags,
            )
        }
        DeclarationCommands::Delete { id } => emit_basic(
            svc.delete_declaration(id).await,
            |()| format!("Crop declaration {id} deleted"),
            flags,
        ),
        DeclarationCommands::Assign(args) => emit_basic(
            svc.assign_declaration_inspector(&args.ids, &args.inspector, args.comment.as_deref())
                .await,
            |changes| summarize(changes),
            flags,
        ),
        DeclarationCommands::Approve(args) => emit_basic(
            svc.approve_declaration(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
        DeclarationCommands::Reject(args) => emit_basic(
            svc.reject_declaration(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
        DeclarationCommands::Halt(args) => emit_basic(
            svc.halt_declaration(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
    }
}
