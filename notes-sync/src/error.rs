use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not authenticated: no stored session credential")]
    NotAuthenticated,

    #[error("Authentication expired: the notes service rejected the stored credential")]
    AuthExpired,

    #[error("API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Rate limited: retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

impl SyncError {
    /// Authentication failures require a fresh login rather than a retry.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::AuthExpired)
    }

    pub fn retry_after(&self) -> Option<u64> {
        if let Self::RateLimited {
            retry_after_seconds,
        } = self
        {
            Some(*retry_after_seconds)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_are_flagged() {
        assert!(SyncError::NotAuthenticated.is_auth());
        assert!(SyncError::AuthExpired.is_auth());
        assert!(
            !SyncError::Api {
                status: 500,
                body: String::new()
            }
            .is_auth()
        );
    }

    #[test]
    fn rate_limited_carries_delay() {
        let err = SyncError::RateLimited {
            retry_after_seconds: 60,
        };
        assert_eq!(err.retry_after(), Some(60));
        assert_eq!(SyncError::AuthExpired.retry_after(), None);
    }
}
