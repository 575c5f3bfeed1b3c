use stts_db::repos::market::NewProduct;
use stts_db::updates::market::ProductUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProductCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::payload::{emit_basic, emit_entity};
use crate::context::AppContext;
use crate::output::output;

/// Handle `stts product`.
pub async fn handle(
    action: &ProductCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        ProductCommands::Create {
            lot,
            name,
            price,
            quantity,
            unit,
        } => {
            let new = NewProduct {
                lot_number: lot.clone(),
                name: name.clone(),
                price: *price,
                quantity: *quantity,
                unit: unit.clone(),
            };
            emit_entity(svc.create_product(new).await, "Product listed", flags)
        }
        ProductCommands::Get { id } => output(&svc.get_product(id).await?, flags.format),
        ProductCommands::List { seller, lot, limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            output(
                &svc.list_products(seller.as_deref(), lot.as_deref(), limit).await?,
                flags.format,
            )
        }
        ProductCommands::Update {
            id,
            name,
            price,
            quantity,
            unit,
        } => {
            let mut builder = ProductUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(price) = price {
                builder = builder.price(*price);
            }
            if let Some(quantity) = quantity {
                builder = builder.quantity(*quantity);
            }
            if let Some(unit) = unit {
                builder = builder.unit(unit);
            }
            emit_entity(svc.update_product(id, builder.build()).await, "Product updated", flags)
        }
        ProductCommands::Delete { id } => emit_basic(
            svc.delete_product(id).await,
            |()| format!("Product {id} delisted"),
            flags,
        ),
    }
}
