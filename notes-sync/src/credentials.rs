//! Stored session credential for the notes endpoint.
//!
//! The credential is an opaque browser session token captured at login and
//! persisted as a small JSON file under the user configuration directory.
//! It is injected into the client explicitly; nothing reads it as ambient
//! global state.

use crate::error::{SyncError, SyncResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCredential {
    pub access_token: String,
    /// Expiry as epoch milliseconds; absent means no known expiry.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl SessionCredential {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at.is_some_and(|at| at < now_ms)
    }
}

pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store backed by `<user config dir>/logos-sync/credentials.json`.
    pub fn open_default() -> SyncResult<Self> {
        let dir = dirs::config_dir().ok_or_else(|| SyncError::Config {
            message: "no user configuration directory".to_string(),
        })?;
        Ok(Self {
            path: dir.join("logos-sync").join("credentials.json"),
        })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The stored credential, or `None` when absent, unreadable, or expired.
    ///
    /// An expired credential is removed as a side effect so later calls do
    /// not keep re-reading it.
    pub fn get(&self) -> Option<SessionCredential> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let credential: SessionCredential = serde_json::from_str(&contents).ok()?;

        if credential.is_expired(Utc::now().timestamp_millis()) {
            debug!("Stored credential is past expiry, clearing");
            self.clear();
            return None;
        }

        Some(credential)
    }

    pub fn put(&self, credential: &SessionCredential) -> SyncResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string(credential)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Remove the stored credential; a missing file is not an error.
    pub fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(error = %e, "Failed to remove credential file");
            }
        }
    }
}
