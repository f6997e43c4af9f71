use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Immutable preference snapshot for one sync invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Directory receiving the per-resource Markdown files. `~`-relative
    /// paths are expanded against the home directory at write time.
    pub output_dir: String,
    /// Comma-separated resource ids excluded from file emission.
    pub excluded_resources: String,
    pub include_highlight_color: bool,
    /// Readwise API token; empty disables archive delivery.
    pub readwise_token: String,
    pub sync_to_readwise: bool,
    /// Gates the unattended `background` and `watch` commands.
    pub auto_sync_enabled: bool,
    pub sync_interval_minutes: u64,
    pub retry: RetryPolicy,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            output_dir: String::new(),
            excluded_resources: String::new(),
            include_highlight_color: true,
            readwise_token: String::new(),
            sync_to_readwise: false,
            auto_sync_enabled: false,
            sync_interval_minutes: 30,
            retry: RetryPolicy::default(),
        }
    }
}

impl Preferences {
    /// Excluded resource ids, trimmed, empty entries dropped.
    pub fn excluded_ids(&self) -> Vec<String> {
        self.excluded_resources
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Bounds on archive-delivery retry behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Re-attempts of one batch after consecutive 429 responses before the
    /// batch is counted as failed.
    pub max_rate_limit_retries: u32,
    /// Pause between successive delivery batches, in milliseconds.
    pub batch_pause_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_rate_limit_retries: 5,
            batch_pause_ms: 500,
        }
    }
}

/// Expand a leading `~` against the home directory.
pub fn expand_path(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(input)
}
