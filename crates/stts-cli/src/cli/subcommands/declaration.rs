use clap::Subcommand;

use super::{AssignArgs, ReviewArgs};

/// Crop declaration commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DeclarationCommands {
    /// Declare crops for QDS production.
    Create {
        #[arg(long)]
        source_of_seed: Option<String>,
        /// Field size in acres.
        #[arg(long)]
        field_size: Option<f64>,
        #[arg(long)]
        seed_quantity: Option<f64>,
        /// Declared variety ID. Repeatable.
        #[arg(long = "variety", required = true)]
        varieties: Vec<String>,
    },
    Get { id: String },
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Update a pending or halted declaration. Given varieties replace the old ones.
    Update {
        id: String,
        #[arg(long)]
        source_of_seed: Option<String>,
        #[arg(long)]
        field_size: Option<f64>,
        #[arg(long)]
        seed_quantity: Option<f64>,
        #[arg(long = "variety")]
        varieties: Vec<String>,
    },
    Delete { id: String },
    Assign(AssignArgs),
    Approve(ReviewArgs),
    Reject(ReviewArgs),
    Halt(ReviewArgs),
}
