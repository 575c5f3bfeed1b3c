use clap::{Args, Subcommand};

/// Account-type flags shared by create and update.
#[derive(Clone, Debug, Default, Args)]
pub struct AccountFlags {
    #[arg(long)]
    pub merchant: Option<bool>,
    #[arg(long)]
    pub grower: Option<bool>,
    #[arg(long)]
    pub qds_producer: Option<bool>,
    #[arg(long)]
    pub inspector: Option<bool>,
    #[arg(long)]
    pub admin: Option<bool>,
}

/// User account commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[command(flatten)]
        flags: AccountFlags,
    },
    Get { id: String },
    List {
        /// Only inspector accounts.
        #[arg(long)]
        inspectors: bool,
        #[arg(long)]
        limit: Option<u32>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[command(flatten)]
        flags: AccountFlags,
    },
    Delete { id: String },
    /// Grant a role to a user.
    Grant {
        #[arg(value_name = "USER_ID")]
        user_id: String,
        #[arg(long)]
        role: String,
    },
    /// Revoke a role from a user.
    Revoke {
        #[arg(value_name = "USER_ID")]
        user_id: String,
        #[arg(long)]
        role: String,
    },
}

/// Role commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RoleCommands {
    Create {
        #[arg(long)]
        name: String,
        /// Permission name such as can_inspect. Repeatable.
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },
    Get { id: String },
    List,
    /// Replace the permissions of a role.
    SetPermissions {
        id: String,
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },
    Delete { id: String },
}
