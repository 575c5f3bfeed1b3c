use stts_core::enums::OrderStatus;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::OrderCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_opt_enum;
use crate::commands::shared::payload::{emit_basic, emit_entity};
use crate::context::AppContext;
use crate::output::output;

/// Handle `stts order`.
pub async fn handle(
    action: &OrderCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        OrderCommands::Place { product, quantity } => emit_entity(
            svc.place_order(product, *quantity).await,
            "Order placed",
            flags,
        ),
        OrderCommands::Get { id } => output(&svc.get_order(id).await?, flags.format),
        OrderCommands::List {
            buyer,
            product,
            status,
            limit,
        } => {
            let status = parse_opt_enum::<OrderStatus>(status.as_deref(), "status")?;
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            output(
                &svc.list_orders(buyer.as_deref(), product.as_deref(), status, limit)
                    .await?,
                flags.format,
            )
        }
        OrderCommands::Accept(args) => emit_basic(
            svc.accept_order(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
        OrderCommands::Reject(args) => emit_basic(
            svc.reject_order(&args.id, args.comment.as_deref()).await,
            |change| change.message(),
            flags,
        ),
    }
}
