//! HTTP client and pager for the Logos notes endpoint.
//!
//! The endpoint is cursor-paginated: each `notes/find` request carries the
//! cursor returned by the previous response, and the response reports
//! whether more pages remain plus a live total. Requests authenticate with
//! the captured browser session cookie read from the credential store on
//! every request, so a credential cleared mid-run fails the next page
//! cleanly instead of retrying with a stale value.

use crate::credentials::CredentialStore;
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use chrono::Local;
use notes_core::RawNote;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_NOTES_API_BASE: &str = "https://app.logos.com/api/app/notes-api";

const PAGE_SIZE: u32 = 100;
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// One page of the paginated notes listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesPage {
    #[serde(default)]
    pub notes: Vec<RawNote>,
    #[serde(default)]
    pub more_notes: bool,
    #[serde(default)]
    pub next_note_key: Option<String>,
    /// Live server-side count; may change between pages.
    #[serde(default)]
    pub note_total: usize,
}

/// Outcome of a login-time token probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCheck {
    Valid,
    /// The service rejected the token outright (401/403).
    Rejected,
    /// The probe failed with an unrelated status; the token may still work.
    Indeterminate(u16),
}

#[async_trait]
pub trait NotesApi: Send + Sync {
    async fn fetch_page(&self, cursor: Option<&str>) -> SyncResult<NotesPage>;
}

pub struct LogosClient {
    http: Client,
    store: Arc<CredentialStore>,
    base_url: String,
}

impl LogosClient {
    pub fn new(store: Arc<CredentialStore>) -> SyncResult<Self> {
        Self::with_base_url(store, DEFAULT_NOTES_API_BASE)
    }

    pub fn with_base_url(
        store: Arc<CredentialStore>,
        base_url: impl Into<String>,
    ) -> SyncResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(SyncError::Http)?;

        Ok(Self {
            http,
            store,
            base_url: base_url.into(),
        })
    }

    /// Validate a candidate session token with a single-note probe request,
    /// without touching the stored credential.
    pub async fn check_token(&self, token: &str) -> SyncResult<TokenCheck> {
        let url = format!("{}/notes/find", self.base_url);
        let body = json!({
            "request": {
                "noteLimit": 1,
                "facets": [{ "field": "noteKind" }],
                "noteTotalField": true,
                "noteFields": ["id", "noteKind"],
                "tzoMinutes": timezone_offset_minutes(),
                "userLanguage": "en-US",
            }
        });

        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Origin", "https://app.logos.com")
            .header("Referer", "https://app.logos.com/tools/notes")
            .header("Cookie", format!("auth={token}"))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(TokenCheck::Valid)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Ok(TokenCheck::Rejected)
        } else {
            Ok(TokenCheck::Indeterminate(status.as_u16()))
        }
    }

    fn find_request_body(cursor: Option<&str>) -> serde_json::Value {
        let start = match cursor {
            Some(key) => json!({ "noteKey": key }),
            None => serde_json::Value::Null,
        };

        json!({
            "request": {
                "start": start,
                "sort": "modifiedDesc",
                "filters": [],
                "filterNoteIds": serde_json::Value::Null,
                "query": serde_json::Value::Null,
                "facetFindText": serde_json::Value::Null,
                "previousNoteLimit": PAGE_SIZE,
                "noteLimit": PAGE_SIZE,
                "facets": [
                    { "field": "noteKind" },
                    { "field": "anchorResource", "termLimit": 30 },
                    { "field": "anchorBibleBook", "termLimit": 120 },
                    { "field": "anchorDataType", "termLimit": 30 },
                ],
                "noteTotalField": true,
                "noteFields": [
                    "id",
                    "revision",
                    "created",
                    "createdBy",
                    "modified",
                    "isTrashed",
                    "isDeleted",
                    "noteKind",
                    "content",
                    "style",
                    "anchors",
                    "tags",
                ],
                "tzoMinutes": timezone_offset_minutes(),
                "userLanguage": "en-US",
            }
        })
    }
}

#[async_trait]
impl NotesApi for LogosClient {
    async fn fetch_page(&self, cursor: Option<&str>) -> SyncResult<NotesPage> {
        let Some(credential) = self.store.get() else {
            return Err(SyncError::NotAuthenticated);
        };

        let url = format!("{}/notes/find", self.base_url);
        debug!(url = %url, cursor = ?cursor, "Fetching notes page");

        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Origin", "https://app.logos.com")
            .header("Referer", "https://app.logos.com/tools/notes")
            .header("Cookie", format!("auth={}", credential.access_token))
            .json(&Self::find_request_body(cursor))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let page = response.json::<NotesPage>().await?;
            return Ok(page);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            self.store.clear();
            return Err(SyncError::AuthExpired);
        }

        let body = response.text().await.unwrap_or_default();
        Err(SyncError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

/// Minutes to add to local time to reach UTC, matching the convention the
/// web client sends (positive west of UTC).
fn timezone_offset_minutes() -> i32 {
    -Local::now().offset().local_minus_utc() / 60
}

/// Fetch every page of notes, strictly sequentially.
///
/// Pagination continues while the response reports more pages, carrying the
/// returned cursor forward. After each page the progress callback receives
/// the count accumulated so far and the server-reported total; the total is
/// live state and need not be monotonic. Any failure aborts the whole
/// fetch; no partial note set is returned.
pub async fn fetch_all_notes(
    client: &dyn NotesApi,
    mut progress: Option<&mut (dyn FnMut(usize, usize) + Send)>,
) -> SyncResult<Vec<RawNote>> {
    let mut all_notes: Vec<RawNote> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page_num = 0u32;

    loop {
        page_num += 1;
        let page = client.fetch_page(cursor.as_deref()).await?;
        debug!(
            page = page_num,
            count = page.notes.len(),
            total = page.note_total,
            more = page.more_notes,
            "Fetched notes page"
        );

        all_notes.extend(page.notes);

        if let Some(callback) = progress.as_deref_mut() {
            callback(all_notes.len(), page.note_total);
        }

        if !page.more_notes {
            break;
        }
        match page.next_note_key {
            Some(key) => cursor = Some(key),
            // "More pages" without a cursor cannot advance; stop here.
            None => break,
        }
    }

    Ok(all_notes)
}
