//! Sync service: fetch, normalize, group, emit, archive.

use crate::client::{NotesApi, fetch_all_notes};
use crate::emit::{group_by_resource, write_markdown};
use crate::error::SyncResult;
use crate::normalize::process_notes;
use crate::readwise::ReadwiseClient;
use chrono::{DateTime, Utc};
use config::Preferences;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Counts from one sync invocation; returned to the caller, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes_fetched: usize,
    pub notes_processed: usize,
    pub files_written: usize,
    pub notes_written: usize,
    pub archived: usize,
    pub archive_errors: usize,
}

impl SyncReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            ..Default::default()
        }
    }

    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }
}

/// Orchestrates one full sync run over injected collaborators.
pub struct SyncService {
    prefs: Preferences,
    client: Arc<dyn NotesApi>,
    readwise: Option<ReadwiseClient>,
}

impl SyncService {
    /// Build a service from preferences, constructing the archive client
    /// when archive sync is enabled and a token is configured.
    pub fn new(prefs: Preferences, client: Arc<dyn NotesApi>) -> SyncResult<Self> {
        let readwise = if prefs.sync_to_readwise && !prefs.readwise_token.is_empty() {
            Some(ReadwiseClient::new(prefs.readwise_token.clone(), prefs.retry)?)
        } else {
            None
        };

        Ok(Self {
            prefs,
            client,
            readwise,
        })
    }

    /// Explicit collaborator injection.
    pub fn with_readwise(
        prefs: Preferences,
        client: Arc<dyn NotesApi>,
        readwise: Option<ReadwiseClient>,
    ) -> Self {
        Self {
            prefs,
            client,
            readwise,
        }
    }

    /// Run one sync: fetch all pages, normalize, group, emit files, and
    /// deliver highlights to the archive.
    ///
    /// A pager failure aborts the whole run. File emission and archive
    /// delivery failures are scoped per document and per batch; they are
    /// reflected in the report instead of failing siblings.
    pub async fn run(
        &self,
        progress: Option<&mut (dyn FnMut(usize, usize) + Send)>,
    ) -> SyncResult<SyncReport> {
        let mut report = SyncReport::new();
        info!("Starting notes sync");

        let raw = fetch_all_notes(self.client.as_ref(), progress).await?;
        report.notes_fetched = raw.len();
        info!(count = report.notes_fetched, "Fetched notes");

        let processed = process_notes(raw);
        report.notes_processed = processed.len();
        info!(count = report.notes_processed, "Normalized notes");

        let groups = group_by_resource(processed.clone());
        info!(resources = groups.len(), "Grouped notes by resource");

        if self.prefs.output_dir.is_empty() {
            info!("No output directory configured, skipping file emission");
        } else {
            let summary = write_markdown(
                &groups,
                &self.prefs.output_dir,
                self.prefs.include_highlight_color,
                &self.prefs.excluded_ids(),
            )?;
            report.files_written = summary.files_written;
            report.notes_written = summary.notes_written;
        }

        if let Some(readwise) = &self.readwise {
            let delivery = readwise.send(&processed).await;
            report.archived = delivery.sent;
            report.archive_errors = delivery.errors;
        }

        report.complete();
        info!(
            files = report.files_written,
            notes = report.notes_written,
            archived = report.archived,
            archive_errors = report.archive_errors,
            "Sync completed"
        );

        Ok(report)
    }
}
