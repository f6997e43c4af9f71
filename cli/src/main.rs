use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Login(args) => commands::login::run(args).await,
        Commands::Logout(args) => commands::logout::run(args),
        Commands::Sync(args) => commands::sync::run(args).await,
        Commands::Background(args) => commands::background::run(args).await,
        Commands::Watch(args) => commands::watch::run(args).await,
        Commands::Browse(args) => commands::browse::run(args).await,
    }
}
