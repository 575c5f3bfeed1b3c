use clap::Subcommand;

use super::{AssignArgs, ReviewArgs};

/// Import/export permit commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PermitCommands {
    /// Apply for a permit.
    Create {
        /// import or export
        #[arg(long = "type")]
        permit_type: String,
        #[arg(long)]
        country: String,
        #[arg(long)]
        purpose: Option<String>,
        /// Line item as VARIETY_ID:QUANTITY[:UNIT]. Repeatable.
        #[arg(long = "item", required = true)]
        items: Vec<String>,
    },
    /// Get a permit with its items.
    Get { id: String },
    /// List permits.
    List {
        #[arg(long = "type")]
        permit_type: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Update a pending or halted permit. Given items replace the old ones.
    Update {
        id: String,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        purpose: Option<String>,
        #[arg(long = "item")]
        items: Vec<String>,
    },
    /// Delete a pending or halted permit.
    Delete { id: String },
    /// Assign an inspector to one or more permits.
    Assign(AssignArgs),
    Approve(ReviewArgs),
    Reject(ReviewArgs),
    Halt(ReviewArgs),
}
