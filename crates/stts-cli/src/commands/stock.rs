use stts_core::enums::SeedClass;
use stts_db::repos::stock::NewStockRecord;
use stts_db::updates::stock::StockUpdate;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::StockCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::commands::shared::payload::{emit_basic, emit_entity};
use crate::context::AppContext;
use crate::output::output;

/// Handle `stts stock`.
pub async fn handle(
    action: &StockCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        StockCommands::Create {
            lot,
            variety,
            seed_class,
            quantity,
            source,
        } => {
            let new = NewStockRecord {
                lot_number: lot.clone(),
                crop_variety_id: variety.clone(),
                seed_class: parse_enum::<SeedClass>(seed_class, "seed class")?,
                quantity: *quantity,
                source: source.clone(),
            };
            emit_entity(svc.create_stock_record(new).await, "Stock recorded", flags)
        }
        StockCommands::Get { id } => output(&svc.get_stock_record(id).await?, flags.format),
        StockCommands::List { owner, lot, limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            output(
                &svc.list_stock_records(owner.as_deref(), lot.as_deref(), limit)
                    .await?,
                flags.format,
            )
        }
        StockCommands::Update {
            id,
            quantity,
            source,
        } => {
            let update = StockUpdate {
                quantity: *quantity,
                source: source.as_ref().map(|s| (!s.is_empty()).then(|| s.clone())),
            };
            emit_entity(svc.update_stock_record(id, update).await, "Stock updated", flags)
        }
        StockCommands::Delete { id } => emit_basic(
            svc.delete_stock_record(id).await,
            |()| format!("Stock record {id} deleted"),
            flags,
        ),
    }
}
