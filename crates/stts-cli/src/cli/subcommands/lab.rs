use clap::Subcommand;

use super::{AssignArgs, ReviewArgs};

/// Seed-lab commands.
#[derive(Clone, Debug, Subcommand)]
pub enum LabCommands {
    /// Request lab testing of a lot.
    Create {
        #[arg(long)]
        lot: String,
        #[arg(long)]
        mother_lot: Option<String>,
        #[arg(long)]
        variety: String,
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
    /// Update a pending request.
    Update {
        id: String,
        #[arg(long)]
        lot: Option<String>,
        #[arg(long)]
        mother_lot: Option<String>,
        #[arg(long)]
        quantity: Option<f64>,
    },
    Delete { id: String },
    Assign(AssignArgs),
    /// File the sampling inspection report (assigned inspector only).
    Submit {
        id: String,
        #[arg(long)]
        report: Option<String>,
        #[arg(long)]
        comment: Option<String>,
    },
    Approve(ReviewArgs),
    Reject(ReviewArgs),
    /// Mark the sample as received at the lab.
    Receive(ReviewArgs),
    /// Record the test verdict on a received sample.
    Result {
        id: String,
        /// approved (marketable) or rejected (not marketable)
        #[arg(long)]
        decision: String,
        /// Test results as JSON.
        #[arg(long)]
        results: Option<String>,
        #[arg(long)]
        comment: Option<String>,
    },
}
