//! Sync command - interactive one-shot synchronization.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use notes_sync::{CredentialStore, LogosClient, SyncService};
use std::sync::Arc;

use crate::commands::ConfigArgs;
use crate::output;

#[derive(Args)]
pub struct SyncArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output the sync report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: SyncArgs) -> Result<()> {
    let prefs = config::load(args.config.config.as_deref())?;

    if prefs.output_dir.is_empty() {
        output::hint("set output_dir in the config file or LOGOS_SYNC_OUTPUT_DIR");
        anyhow::bail!("no output directory configured");
    }

    let store = Arc::new(CredentialStore::open_default()?);
    if store.get().is_none() {
        output::hint("run `logos-sync login` first");
        anyhow::bail!("not logged in");
    }

    let client = Arc::new(LogosClient::new(store)?);
    let service = SyncService::new(prefs, client)?;

    let quiet = args.json;
    if !quiet {
        output::header("Syncing Logos notes");
        println!();
    }

    let mut progress = move |fetched: usize, total: usize| {
        if !quiet {
            println!("  fetched {}/{}", fetched.to_string().cyan(), total);
        }
    };

    let report = match service.run(Some(&mut progress)).await {
        Ok(report) => report,
        Err(e) => {
            if e.is_auth() {
                output::hint("run `logos-sync login` to refresh the session token");
            }
            anyhow::bail!("sync failed: {e}");
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    let mut summary = format!(
        "{} notes to {} files",
        report.notes_written, report.files_written
    );
    if report.archived > 0 {
        summary.push_str(&format!(", {} highlights to Readwise", report.archived));
    }
    output::success(&format!("Synced {summary}"));

    if report.archive_errors > 0 {
        output::warn(&format!(
            "{} highlights failed to archive",
            report.archive_errors
        ));
    }

    Ok(())
}
