mod application;
mod crop;
mod declaration;
mod lab;
mod label;
mod market;
mod permit;
mod planting_return;
mod stock;
mod token;
mod user;

use clap::Args;

pub use application::ApplicationCommands;
pub use crop::CropCommands;
pub use declaration::DeclarationCommands;
pub use lab::LabCommands;
pub use label::LabelCommands;
pub use market::{OrderCommands, ProductCommands};
pub use permit::PermitCommands;
pub use planting_return::ReturnCommands;
pub use stock::StockCommands;
pub use token::TokenCommands;
pub use user::{AccountFlags, RoleCommands, UserCommands};

/// Bulk inspector assignment.
#[derive(Clone, Debug, Args)]
pub struct AssignArgs {
    /// Record IDs. All are checked before any is assigned.
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,
    /// User ID of the inspector (must be an inspector account).
    #[arg(long)]
    pub inspector: String,
    #[arg(long)]
    pub comment: Option<String>,
}

/// A status change on one record.
#[derive(Clone, Debug, Args)]
pub struct ReviewArgs {
    pub id: String,
    #[arg(long)]
    pub comment: Option<String>,
}
