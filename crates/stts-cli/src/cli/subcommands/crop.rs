use clap::Subcommand;

/// Crop commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CropCommands {
    /// Create a crop with its varieties and inspection stages.
    Create {
        #[arg(long)]
        name: String,
        /// Variety name. Repeatable.
        #[arg(long = "variety")]
        varieties: Vec<String>,
        /// Inspection stage as NAME[:DAYS_AFTER_PLANTING], in order. Repeatable.
        #[arg(long = "stage")]
        stages: Vec<String>,
    },
    Get { id: String },
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Update a crop. With --replace the given varieties and stages replace the old ones.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "variety")]
        varieties: Vec<String>,
        #[arg(long = "stage")]
        stages: Vec<String>,
        #[arg(long)]
        replace: bool,
    },
    Delete { id: String },
}
