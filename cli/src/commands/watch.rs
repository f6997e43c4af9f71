//! Watch command - periodic background sync until interrupted.

use anyhow::Result;
use clap::Args;
use notes_sync::{CredentialStore, LogosClient, SyncScheduler, SyncService};
use std::sync::Arc;

use crate::commands::ConfigArgs;
use crate::output;

#[derive(Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Run one sync immediately before starting the schedule
    #[arg(long)]
    pub now: bool,
}

pub async fn run(args: WatchArgs) -> Result<()> {
    let prefs = config::load(args.config.config.as_deref())?;

    if !prefs.auto_sync_enabled {
        output::hint("set auto_sync_enabled = true in the config file to use watch");
        anyhow::bail!("auto sync is disabled");
    }

    let store = Arc::new(CredentialStore::open_default()?);
    if store.get().is_none() {
        output::hint("run `logos-sync login` first");
        anyhow::bail!("not logged in");
    }

    let interval = prefs.sync_interval_minutes;
    let client = Arc::new(LogosClient::new(store)?);
    let service = SyncService::new(prefs, client)?;

    let mut scheduler = SyncScheduler::new(service, interval).await?;

    if args.now {
        let report = scheduler.run_now().await?;
        output::success(&format!(
            "Synced {} notes to {} files",
            report.notes_written, report.files_written
        ));
    }

    scheduler.start().await?;
    output::info(&format!(
        "Watching for changes; syncing every {interval} minutes (ctrl-c to stop)"
    ));

    tokio::signal::ctrl_c().await?;
    scheduler.stop().await?;

    Ok(())
}
