use clap::Subcommand;

use super::ReviewArgs;

/// Product listing commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProductCommands {
    /// List a marketable lot for sale.
    Create {
        #[arg(long)]
        lot: String,
        #[arg(long)]
        name: String,
        /// Price per unit.
        #[arg(long)]
        price: f64,
        #[arg(long)]
        quantity: f64,
        #[arg(long, default_value = "kg")]
        unit: String,
    },
    Get { id: String },
    List {
        #[arg(long)]
        seller: Option<String>,
        #[arg(long)]
        lot: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        quantity: Option<f64>,
        #[arg(long)]
        unit: Option<String>,
    },
    Delete { id: String },
}

/// Order commands.
#[derive(Clone, Debug, Subcommand)]
pub enum OrderCommands {
    /// Place an order against a listing.
    Place {
        #[arg(long)]
        product: String,
        #[arg(long)]
        quantity: f64,
    },
    Get { id: String },
    List {
        #[arg(long)]
        buyer: Option<String>,
        #[arg(long)]
        product: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Accept an order (seller or approver). Takes stock from the listing.
    Accept(ReviewArgs),
    Reject(ReviewArgs),
}
