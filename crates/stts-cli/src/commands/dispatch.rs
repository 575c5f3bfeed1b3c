use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Init(args) => commands::init::handle(&args, ctx, flags).await,
        Commands::Whoami => commands::whoami::handle(ctx, flags).await,
        Commands::Trace(args) => commands::trace::handle(&args, ctx, flags).await,
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags).await,
        Commands::User { action } => commands::user::handle(&action, ctx, flags).await,
        Commands::Role { action } => commands::role::handle(&action, ctx, flags).await,
        Commands::Crop { action } => commands::crop::handle(&action, ctx, flags).await,
        Commands::Application { action } => {
            commands::application::handle(&action, ctx, flags).await
        }
        Commands::Permit { action } => commands::permit::handle(&action, ctx, flags).await,
        Commands::Declaration { action } => {
            commands::declaration::handle(&action, ctx, flags).await
        }
        Commands::Return { action } => {
            commands::planting_return::handle(&action, ctx, flags).await
        }
        Commands::Lab { action } => commands::lab::handle(&action, ctx, flags).await,
        Commands::Label { action } => commands::label::handle(&action, ctx, flags).await,
        Commands::Stock { action } => commands::stock::handle(&action, ctx, flags).await,
        Commands::Product { action } => commands::product::handle(&action, ctx, flags).await,
        Commands::Order { action } => commands::order::handle(&action, ctx, flags).await,
        Commands::Schema(_) | Commands::Token { .. } => {
            unreachable!("schema/token are pre-dispatched in main")
        }
    }
}
