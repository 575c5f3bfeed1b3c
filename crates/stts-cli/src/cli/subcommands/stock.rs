use clap::Subcommand;

/// Stock record commands.
#[derive(Clone, Debug, Subcommand)]
pub enum StockCommands {
    Create {
        #[arg(long)]
        lot: String,
        #[arg(long)]
        variety: String,
        #[arg(long)]
        seed_class: String,
        #[arg(long)]
        quantity: f64,
        #[arg(long)]
        source: Option<String>,
    },
    Get { id: String },
    List {
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        lot: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Update {
        id: String,
        #[arg(long)]
        quantity: Option<f64>,
        #[arg(long)]
        source: Option<String>,
    },
    Delete { id: String },
}
