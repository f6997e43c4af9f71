//! # Logos Notes Sync Core
//!
//! Shared types and pure helpers for the sync pipeline:
//! - canonical note records (`RawNote`, `ProcessedNote`)
//! - plain-text extraction from the Logos rich-text markup
//! - deep links back into Logos resources

pub mod links;
pub mod richtext;
pub mod types;

pub use links::build_resource_link;
pub use richtext::extract_text;
pub use types::{
    NoteAnchor, NoteKind, NoteReference, NoteStyle, ProcessedNote, RawNote, TextRange,
    UNKNOWN_RESOURCE,
};
