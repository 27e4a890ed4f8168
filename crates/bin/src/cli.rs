//! CLI argument definitions for the warehouse binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use warehouse::constants::DEFAULT_PORT;

/// Storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// SQLite database file (default)
    Sqlite,
    /// PostgreSQL database
    Postgres,
}

/// Warehouse layout server
#[derive(Parser, Debug)]
#[command(name = "warehouse")]
#[command(about = "Warehouse layout service: maps, aisles, shelves and locations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (the default when no command is given)
    Serve(ServeArgs),
    /// Check health of a running server
    Health(HealthArgs),
    /// Inspect stored maps
    Maps {
        #[command(subcommand)]
        command: MapsCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum MapsCommand {
    /// List every map with its shelf count
    List(MapsListArgs),
    /// Show one map with its aisles
    Show(MapsShowArgs),
}

/// Where the data lives. Shared by every command that opens the store.
#[derive(clap::Args, Debug, Clone)]
pub struct BackendConfig {
    /// Storage backend to use
    #[arg(short, long, default_value = "sqlite", env = "WAREHOUSE_BACKEND")]
    pub backend: Backend,

    /// Data directory for storage files.
    /// For SQLite: stores warehouse.db
    #[arg(short = 'D', long, env = "WAREHOUSE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// PostgreSQL connection URL (required when backend=postgres)
    #[arg(long, env = "WAREHOUSE_POSTGRES_URL")]
    pub postgres_url: Option<String>,
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "WAREHOUSE_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "WAREHOUSE_HOST")]
    pub host: String,

    #[command(flatten)]
    pub backend_config: BackendConfig,
}

/// Arguments for the health command
#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Base URL of the server to check
    #[arg(long, default_value = "http://127.0.0.1:3333", env = "WAREHOUSE_URL")]
    pub url: String,

    /// Timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    pub timeout: u64,
}

/// Arguments for `maps list`
#[derive(clap::Args, Debug)]
pub struct MapsListArgs {
    #[command(flatten)]
    pub backend_config: BackendConfig,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `maps show`
#[derive(clap::Args, Debug)]
pub struct MapsShowArgs {
    /// Id of the map to show
    pub map_id: i64,

    #[command(flatten)]
    pub backend_config: BackendConfig,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
