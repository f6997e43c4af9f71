//! # Logos Notes Sync Pipeline
//!
//! Synchronizes notes and highlights from the Logos notes endpoint into a
//! folder of per-resource Markdown files and the Readwise archive:
//! cursor-paginated fetch, normalization and deduplication, grouping,
//! idempotent file emission, and rate-limit-aware archive delivery.

pub mod client;
pub mod credentials;
pub mod emit;
pub mod error;
pub mod normalize;
pub mod readwise;
pub mod scheduler;
pub mod sync;

pub use client::{
    DEFAULT_NOTES_API_BASE, LogosClient, NotesApi, NotesPage, TokenCheck, fetch_all_notes,
};
pub use credentials::{CredentialStore, SessionCredential};
pub use emit::{WriteSummary, group_by_resource, sanitize_filename, write_markdown};
pub use error::{SyncError, SyncResult};
pub use normalize::process_notes;
pub use readwise::{DEFAULT_READWISE_API_BASE, DeliveryReport, ReadwiseClient};
pub use scheduler::SyncScheduler;
pub use sync::{SyncReport, SyncService};
