use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `stts` binary.
#[derive(Debug, Parser)]
#[command(
    name = "stts",
    version,
    about = "STTS - seed tracking and traceability"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Bearer token identifying the caller (overrides STTS_AUTH__TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Act as this stored user when no token is given
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Database file (overrides STTS_DATABASE__PATH)
    #[arg(long, global = true)]
    pub db: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            token: self.token.clone(),
            user: self.user.clone(),
            db: self.db.clone(),
        }
    }
}
