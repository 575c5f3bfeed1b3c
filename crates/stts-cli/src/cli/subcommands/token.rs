use clap::Subcommand;

/// Token inspection commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TokenCommands {
    /// Decode the claims of a token (defaults to the configured token).
    Decode {
        #[arg(value_name = "TOKEN")]
        bearer: Option<String>,
    },
    /// Show the flattened permission map of a token.
    Permissions {
        #[arg(value_name = "TOKEN")]
        bearer: Option<String>,
    },
}
