//! # Configuration
//!
//! Preference snapshot and loading for Logos Notes Sync.
//!
//! Sources, in precedence order: `LOGOS_SYNC_*` environment variables,
//! then the TOML configuration file, then built-in defaults. The result is
//! an immutable [`Preferences`] value handed to each sync invocation.

pub mod loader;
pub mod preferences;

pub use loader::{ConfigError, apply_env_overrides, default_config_path, load, load_from_toml};
pub use preferences::{Preferences, RetryPolicy, expand_path};
