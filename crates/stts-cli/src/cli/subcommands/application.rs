use clap::Subcommand;

use super::{AssignArgs, ReviewArgs};

/// SR4 / SR6 / QDS application commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ApplicationCommands {
    /// Submit an application.
    Create {
        /// Form: sr4, sr6, qds
        #[arg(long)]
        form: String,
        /// Form fields as a JSON object.
        #[arg(long, default_value = "{}")]
        details: String,
        /// Date the registration stays valid until (YYYY-MM-DD).
        #[arg(long)]
        valid_until: Option<String>,
    },
    /// Get an application by ID.
    Get { id: String },
    /// List applications.
    List {
        #[arg(long)]
        form: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Update a pending or halted application.
    Update {
        id: String,
        #[arg(long)]
        details: Option<String>,
        #[arg(long, conflicts_with = "clear_valid_until")]
        valid_until: Option<String>,
        #[arg(long)]
        clear_valid_until: bool,
    },
    /// Delete a pending or halted application.
    Delete { id: String },
    /// Assign an inspector to one or more applications.
    Assign(AssignArgs),
    Approve(ReviewArgs),
    Reject(ReviewArgs),
    Halt(ReviewArgs),
}
