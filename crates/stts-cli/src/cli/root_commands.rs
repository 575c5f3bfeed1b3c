use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    ApplicationCommands, CropCommands, DeclarationCommands, LabCommands, LabelCommands,
    OrderCommands, PermitCommands, ProductCommands, ReturnCommands, RoleCommands, StockCommands,
    TokenCommands, UserCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the database and its first administrator.
    Init(InitArgs),
    /// Show the resolved caller and their permissions.
    Whoami,
    /// Trace a seed lot through stock, labels and the seed lab.
    Trace(TraceArgs),
    /// View audit trail.
    Audit(AuditArgs),
    /// Dump JSON schema for a registered type.
    Schema(SchemaArgs),
    /// Inspect a bearer token without touching the database.
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },
    /// User accounts.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Roles and their permissions.
    Role {
        #[command(subcommand)]
        action: RoleCommands,
    },
    /// Crops, varieties and inspection-stage templates.
    Crop {
        #[command(subcommand)]
        action: CropCommands,
    },
    /// SR4 / SR6 / QDS applications.
    Application {
        #[command(subcommand)]
        action: ApplicationCommands,
    },
    /// Import and export permits.
    Permit {
        #[command(subcommand)]
        action: PermitCommands,
    },
    /// QDS crop declarations.
    Declaration {
        #[command(subcommand)]
        action: DeclarationCommands,
    },
    /// Planting returns and their field-inspection stages.
    Return {
        #[command(subcommand)]
        action: ReturnCommands,
    },
    /// Seed-lab requests and test results.
    Lab {
        #[command(subcommand)]
        action: LabCommands,
    },
    /// Seed labels.
    Label {
        #[command(subcommand)]
        action: LabelCommands,
    },
    /// Seed stock records.
    Stock {
        #[command(subcommand)]
        action: StockCommands,
    },
    /// Marketplace listings.
    Product {
        #[command(subcommand)]
        action: ProductCommands,
    },
    /// Marketplace orders.
    Order {
        #[command(subcommand)]
        action: OrderCommands,
    },
}

/// Arguments for `stts init`.
#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Username of the first administrator.
    #[arg(long, default_value = "admin")]
    pub username: String,
    /// Display name of the first administrator.
    #[arg(long, default_value = "Administrator")]
    pub name: String,
}

/// Arguments for `stts trace`.
#[derive(Clone, Debug, Args)]
pub struct TraceArgs {
    pub lot_number: String,
}

/// Arguments for `stts audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long = "entity-type")]
    pub entity_type: Option<String>,
    #[arg(long = "entity-id")]
    pub entity_id: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
    #[arg(long)]
    pub actor: Option<String>,
}

/// Arguments for `stts schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type name (for example: permit, planting-return, trace-result). `list` shows all.
    pub type_name: String,
}
