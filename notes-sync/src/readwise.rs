//! Readwise archive delivery.
//!
//! Highlights are shipped in fixed-size batches. A 429 response suspends
//! the batch for the server-requested interval and re-attempts it, bounded
//! by the configured retry policy; any other failure marks the batch as
//! errored and moves on so one bad batch never blocks the rest.

use crate::error::{SyncError, SyncResult};
use config::RetryPolicy;
use notes_core::{NoteKind, ProcessedNote};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_READWISE_API_BASE: &str = "https://readwise.io/api/v2";

const BATCH_SIZE: usize = 100;
const MAX_TEXT_CHARS: usize = 8191;
const MAX_TITLE_CHARS: usize = 511;
const DEFAULT_RETRY_AFTER_SECONDS: u64 = 60;

#[derive(Debug, Serialize)]
struct ReadwiseHighlight {
    text: String,
    title: String,
    source_type: &'static str,
    category: &'static str,
    location_type: &'static str,
    highlighted_at: String,
    /// Stable per-note URL; the service deduplicates on it across runs.
    highlight_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub errors: usize,
}

pub struct ReadwiseClient {
    http: Client,
    base_url: String,
    token: String,
    retry: RetryPolicy,
}

impl ReadwiseClient {
    pub fn new(token: impl Into<String>, retry: RetryPolicy) -> SyncResult<Self> {
        Self::with_base_url(token, retry, DEFAULT_READWISE_API_BASE)
    }

    pub fn with_base_url(
        token: impl Into<String>,
        retry: RetryPolicy,
        base_url: impl Into<String>,
    ) -> SyncResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(SyncError::Http)?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
            retry,
        })
    }

    /// Deliver all textual highlights among `notes` to the archive.
    pub async fn send(&self, notes: &[ProcessedNote]) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        if self.token.is_empty() {
            debug!("No archive token configured, skipping delivery");
            return report;
        }

        let highlights: Vec<&ProcessedNote> = notes
            .iter()
            .filter(|note| note.kind == NoteKind::Highlight && !note.text.trim().is_empty())
            .collect();
        if highlights.is_empty() {
            debug!("No highlights to archive");
            return report;
        }

        debug!(count = highlights.len(), "Delivering highlights to archive");

        let batch_count = highlights.len().div_ceil(BATCH_SIZE);
        for (index, batch) in highlights.chunks(BATCH_SIZE).enumerate() {
            let payload: Vec<ReadwiseHighlight> =
                batch.iter().map(|note| to_highlight(note)).collect();

            let mut rate_limit_attempts = 0u32;
            loop {
                match self.post_batch(&payload).await {
                    Ok(()) => {
                        debug!(batch = index + 1, count = batch.len(), "Archived batch");
                        report.sent += batch.len();
                        break;
                    }
                    Err(SyncError::RateLimited {
                        retry_after_seconds,
                    }) => {
                        if rate_limit_attempts >= self.retry.max_rate_limit_retries {
                            warn!(
                                batch = index + 1,
                                attempts = rate_limit_attempts,
                                "Rate-limit retries exhausted, dropping batch"
                            );
                            report.errors += batch.len();
                            break;
                        }
                        rate_limit_attempts += 1;
                        debug!(
                            seconds = retry_after_seconds,
                            attempt = rate_limit_attempts,
                            "Rate limited, backing off"
                        );
                        tokio::time::sleep(Duration::from_secs(retry_after_seconds)).await;
                    }
                    Err(e) => {
                        warn!(batch = index + 1, error = %e, "Failed to archive batch");
                        report.errors += batch.len();
                        break;
                    }
                }
            }

            if index + 1 < batch_count {
                tokio::time::sleep(Duration::from_millis(self.retry.batch_pause_ms)).await;
            }
        }

        debug!(
            sent = report.sent,
            errors = report.errors,
            "Archive delivery complete"
        );
        report
    }

    /// Check the token against the archive's auth endpoint.
    pub async fn verify_token(&self) -> bool {
        let url = format!("{}/auth/", self.base_url);
        match self
            .http
            .get(&url)
            .header("Authorization", format!("Token {}", self.token))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn post_batch(&self, highlights: &[ReadwiseHighlight]) -> SyncResult<()> {
        let url = format!("{}/highlights/", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Token {}", self.token))
            .json(&serde_json::json!({ "highlights": highlights }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_seconds = response
                .headers()
                .get("Retry-After")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS);
            return Err(SyncError::RateLimited {
                retry_after_seconds,
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(SyncError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

fn to_highlight(note: &ProcessedNote) -> ReadwiseHighlight {
    ReadwiseHighlight {
        text: truncate_chars(&note.text, MAX_TEXT_CHARS),
        title: truncate_chars(&note.resource_title, MAX_TITLE_CHARS),
        source_type: "logos",
        category: "books",
        location_type: "order",
        highlighted_at: note.created.clone(),
        highlight_url: format!("logos://note/{}", note.id),
        note: note.reference.clone(),
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
