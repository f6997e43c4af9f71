//! Unattended periodic sync.
//!
//! Wraps the sync service in a cron job at the configured interval. Runs
//! are silent: failures are logged and retained in the last report, never
//! surfaced to a user, so an expired credential cannot spam an unattended
//! session.

use crate::error::{SyncError, SyncResult};
use crate::sync::{SyncReport, SyncService};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

pub struct SyncScheduler {
    scheduler: JobScheduler,
    service: Arc<SyncService>,
    last_report: Arc<RwLock<Option<SyncReport>>>,
}

impl SyncScheduler {
    pub async fn new(service: SyncService, interval_minutes: u64) -> SyncResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| SyncError::Scheduler(e.to_string()))?;

        let service = Arc::new(service);
        let last_report = Arc::new(RwLock::new(None));

        let cron_expression = format!("0 */{} * * * *", interval_minutes.clamp(1, 59));

        let service_clone = service.clone();
        let report_clone = last_report.clone();

        let job = Job::new_async(cron_expression.as_str(), move |_uuid, _lock| {
            let service = service_clone.clone();
            let report = report_clone.clone();
            Box::pin(async move {
                info!("Starting scheduled notes sync");
                match service.run(None).await {
                    Ok(sync_report) => {
                        info!(
                            files = sync_report.files_written,
                            notes = sync_report.notes_written,
                            archived = sync_report.archived,
                            "Scheduled sync completed"
                        );
                        let mut guard = report.write().await;
                        *guard = Some(sync_report);
                    }
                    Err(e) => {
                        error!(error = %e, "Scheduled sync failed");
                    }
                }
            })
        })
        .map_err(|e| SyncError::Scheduler(e.to_string()))?;

        scheduler
            .add(job)
            .await
            .map_err(|e| SyncError::Scheduler(e.to_string()))?;

        Ok(Self {
            scheduler,
            service,
            last_report,
        })
    }

    pub async fn start(&self) -> SyncResult<()> {
        self.scheduler
            .start()
            .await
            .map_err(|e| SyncError::Scheduler(e.to_string()))?;
        info!("Sync scheduler started");
        Ok(())
    }

    pub async fn stop(&mut self) -> SyncResult<()> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| SyncError::Scheduler(e.to_string()))?;
        info!("Sync scheduler stopped");
        Ok(())
    }

    /// Run a sync immediately, outside the schedule.
    pub async fn run_now(&self) -> SyncResult<SyncReport> {
        let report = self.service.run(None).await?;
        let mut guard = self.last_report.write().await;
        *guard = Some(report.clone());
        Ok(report)
    }

    pub async fn last_report(&self) -> Option<SyncReport> {
        self.last_report.read().await.clone()
    }
}
