//! Background command - unattended one-shot sync.
//!
//! Intended for launchd/cron invocation. Gated on the `auto_sync_enabled`
//! preference, and silent on failure: errors go to the log, never to the
//! terminal, so an unattended run cannot spam the user.

use anyhow::Result;
use clap::Args;
use notes_sync::{CredentialStore, LogosClient, SyncService};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::commands::ConfigArgs;

#[derive(Args)]
pub struct BackgroundArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub async fn run(args: BackgroundArgs) -> Result<()> {
    let prefs = config::load(args.config.config.as_deref())?;

    if !prefs.auto_sync_enabled {
        debug!("Auto-sync disabled, skipping background sync");
        return Ok(());
    }

    let store = Arc::new(CredentialStore::open_default()?);
    if store.get().is_none() {
        warn!("Background sync skipped: not logged in");
        return Ok(());
    }

    let client = Arc::new(LogosClient::new(store)?);
    let service = SyncService::new(prefs, client)?;

    match service.run(None).await {
        Ok(report) => {
            info!(
                files = report.files_written,
                notes = report.notes_written,
                archived = report.archived,
                "Background sync completed"
            );
        }
        Err(e) => {
            error!(error = %e, "Background sync failed");
        }
    }

    Ok(())
}
