use stts_db::updates::crop::CropUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CropCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_stage;
use crate::commands::shared::payload::{emit_basic, emit_entity};
use crate::context::AppContext;
use crate::output::output;

/// Handle `stts crop`.
pub async fn handle(
    action: &CropCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CropCommands::Create {
            name,
            varieties,
            stages,
        } => {
            let stages = stages
                .iter()
                .map(|raw| parse_stage(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            emit_entity(
                ctx.service.create_crop(name, varieties, stages).await,
                "Crop created",
                flags,
            )
        }
        CropCommands::Get { id } => output(&ctx.service.get_crop(id).await?, flags.format),
        CropCommands::List { limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            output(&ctx.service.list_crops(limit).await?, flags.format)
        }
        CropCommands::Update {
            id,
            name,
            varieties,
            stages,
            replace,
        } => {
            if !replace && (!varieties.is_empty() || !stages.is_empty()) {
                anyhow::bail!("--variety and --stage replace the crop's lists; pass --replace to confirm");
            }
            let mut builder = CropUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if *replace {
                let stages = stages
                    .iter()
                    .map(|raw| parse_stage(raw))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                builder = builder.varieties(varieties.clone()).stages(stages);
            }
            emit_entity(
                ctx.service.update_crop(id, builder.build(), *replace).await,
                "Crop updated",
                flags,
            )
        }
        CropCommands::Delete { id } => emit_basic(
            ctx.service.delete_crop(id).await,
            |()| format!("Crop {id} deleted"),
            flags,
        ),
    }
}
