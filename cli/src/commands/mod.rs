pub mod background;
pub mod browse;
pub mod login;
pub mod logout;
pub mod sync;
pub mod watch;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "logos-sync",
    author,
    version,
    about = "Sync Logos notes and highlights to Markdown files and Readwise",
    long_about = "Fetches your notes and highlights from the Logos notes service, writes one \
                  Markdown file per resource into a local folder, and optionally delivers \
                  highlights to Readwise.\n\nRun `logos-sync login` once to capture a session \
                  token, then `logos-sync sync`."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Capture and validate a Logos session token")]
    Login(login::LoginArgs),

    #[command(about = "Clear the stored session token")]
    Logout(logout::LogoutArgs),

    #[command(about = "Sync notes to Markdown files and Readwise")]
    Sync(sync::SyncArgs),

    #[command(about = "Unattended one-shot sync; silent unless auto-sync is enabled")]
    Background(background::BackgroundArgs),

    #[command(about = "Run the periodic background sync until interrupted")]
    Watch(watch::WatchArgs),

    #[command(about = "Browse and search fetched notes")]
    Browse(browse::BrowseArgs),
}

/// Shared `--config` option for commands that read preferences.
#[derive(Args)]
pub struct ConfigArgs {
    /// Path to the configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
