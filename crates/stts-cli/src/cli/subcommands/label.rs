use clap::Subcommand;

use super::ReviewArgs;

/// Seed label commands.
#[derive(Clone, Debug, Subcommand)]
pub enum LabelCommands {
    /// Request labels for a marketable lab record.
    Create {
        /// Lab request ID.
        #[arg(long)]
        lab: String,
        #[arg(long)]
        quantity: f64,
    },
    Get { id: String },
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        lot: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Update {
        id: String,
        #[arg(long)]
        quantity: f64,
    },
    Delete { id: String },
    Approve(ReviewArgs),
    Reject(ReviewArgs),
    /// Mark an approved label as printed.
    Print { id: String },
}
