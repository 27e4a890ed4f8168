use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backend;
mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, MapsCommand, ServeArgs};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warehouse=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::run(&args).await,
        Some(Commands::Health(args)) => commands::health::run(&args).await,
        Some(Commands::Maps { command }) => match command {
            MapsCommand::List(args) => commands::maps::list(&args).await,
            MapsCommand::Show(args) => commands::maps::show(&args).await,
        },
        // No command: serve with flags taken from the environment
        None => commands::serve::run(&ServeArgs::parse_from(["warehouse"])).await,
    }
}
