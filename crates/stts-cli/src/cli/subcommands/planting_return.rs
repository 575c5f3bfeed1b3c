use clap::Subcommand;

use super::{AssignArgs, ReviewArgs};

/// Planting return commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReturnCommands {
    /// File a planting return. Inspection stages come from the crop.
    Create {
        #[arg(long)]
        variety: String,
        /// pre_basic, basic, certified, qds
        #[arg(long)]
        seed_class: String,
        #[arg(long)]
        location: String,
        /// Area planted in acres.
        #[arg(long)]
        area: f64,
        /// Seed quantity planted in kg.
        #[arg(long)]
        quantity: f64,
        /// Planting date (YYYY-MM-DD).
        #[arg(long)]
        date_planted: Option<String>,
        #[arg(long)]
        lot: Option<String>,
    },
    /// Get a return with its inspection stages.
    Get { id: String },
    List {
        #[arg(long)]
        status: Option<String>,
        /// Only returns assigned to this inspector.
        #[arg(long)]
        inspector: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Update {
        id: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        area: Option<f64>,
        #[arg(long)]
        quantity: Option<f64>,
        #[arg(long)]
        date_planted: Option<String>,
        #[arg(long)]
        lot: Option<String>,
    },
    Delete { id: String },
    Assign(AssignArgs),
    /// Submit the next field-inspection stage (assigned inspector only).
    SubmitStage {
        id: String,
        #[arg(long)]
        stage: String,
        /// approved, rejected, halted
        #[arg(long)]
        decision: String,
        /// Inspection report as JSON.
        #[arg(long)]
        report: Option<String>,
        #[arg(long)]
        comment: Option<String>,
    },
    Approve(ReviewArgs),
    Reject(ReviewArgs),
    Halt(ReviewArgs),
}
