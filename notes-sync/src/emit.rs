//! Grouping and Markdown file emission.
//!
//! Notes are partitioned by source resource and rendered to one Markdown
//! file per resource: a YAML frontmatter block, a title heading, then one
//! bullet per note with its reference and a deep link back into Logos.
//! Files are fully overwritten on every run; with an unchanged note set the
//! output is byte-identical except for the `synced:` date line.

use crate::error::SyncResult;
use chrono::Utc;
use config::expand_path;
use notes_core::{ProcessedNote, UNKNOWN_RESOURCE, build_resource_link};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Characters stripped from resource titles when deriving filenames.
const ILLEGAL_FILENAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const MAX_FILENAME_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub files_written: usize,
    pub notes_written: usize,
}

/// Partition notes by resource id, preserving first-seen resource order.
pub fn group_by_resource(notes: Vec<ProcessedNote>) -> Vec<(String, Vec<ProcessedNote>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<ProcessedNote>> = HashMap::new();

    for note in notes {
        let key = note.resource_id.clone();
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(note);
    }

    order
        .into_iter()
        .map(|key| {
            let notes = groups.remove(&key).unwrap_or_default();
            (key, notes)
        })
        .collect()
}

/// Derive a filesystem-safe filename stem from a resource title.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !ILLEGAL_FILENAME_CHARS.contains(c))
        .collect();
    cleaned.trim().chars().take(MAX_FILENAME_CHARS).collect()
}

/// Write one Markdown file per non-excluded resource group.
///
/// Groups whose notes all have empty trimmed text produce no file and leave
/// any pre-existing file untouched. A failed write is logged and skipped;
/// it does not abort the remaining groups.
///
/// `include_color` is accepted for preference parity; the rendered body
/// does not currently carry a color line.
/// TODO: render the highlight color label when the flag is set.
pub fn write_markdown(
    groups: &[(String, Vec<ProcessedNote>)],
    output_dir: &str,
    include_color: bool,
    excluded_resource_ids: &[String],
) -> SyncResult<WriteSummary> {
    let _ = include_color;

    let dir = expand_path(output_dir);
    std::fs::create_dir_all(&dir)?;

    let mut summary = WriteSummary::default();

    for (resource_id, notes) in groups {
        if excluded_resource_ids.iter().any(|id| id == resource_id) {
            debug!(resource = %resource_id, "Resource excluded, skipping");
            continue;
        }

        let mut notes_with_text: Vec<&ProcessedNote> = notes
            .iter()
            .filter(|note| !note.text.trim().is_empty())
            .collect();
        if notes_with_text.is_empty() {
            continue;
        }

        // Title comes from the first textual note in group order, before
        // the render-time sort below.
        let resource_title = notes_with_text[0].resource_title.clone();

        // Ascending creation order; the sort is stable so equal timestamps
        // keep their fetched order. Lexical comparison is chronological
        // because the timestamps are zero-padded ISO-8601.
        notes_with_text.sort_by(|a, b| a.created.cmp(&b.created));

        let path: PathBuf = dir.join(format!("{}.md", sanitize_filename(&resource_title)));
        let content = render_resource(&resource_title, resource_id, &notes_with_text);

        match std::fs::write(&path, content) {
            Ok(()) => {
                debug!(file = %path.display(), notes = notes_with_text.len(), "Wrote resource file");
                summary.files_written += 1;
                summary.notes_written += notes_with_text.len();
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Failed to write resource file");
            }
        }
    }

    Ok(summary)
}

fn render_resource(title: &str, resource_id: &str, notes: &[&ProcessedNote]) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(frontmatter(title, resource_id, notes.len()));
    parts.push(String::new());
    parts.push(format!("# {title}"));
    parts.push(String::new());

    for note in notes {
        parts.push(bullet_lines(&note.text));

        let mut annotation: Vec<String> = Vec::new();
        if let Some(reference) = &note.reference {
            annotation.push(reference.clone());
        }
        if !resource_id.is_empty() && resource_id != UNKNOWN_RESOURCE {
            let link = build_resource_link(resource_id, Some(&note.text));
            annotation.push(format!("[Open in Logos]({link})"));
        }
        if !annotation.is_empty() {
            parts.push(format!("  *{}*", annotation.join(" | ")));
        }

        parts.push(String::new());
    }

    parts.join("\n")
}

fn frontmatter(title: &str, resource_id: &str, note_count: usize) -> String {
    let mut lines: Vec<String> = vec!["---".to_string()];
    lines.push(format!("title: {title}"));

    if !resource_id.is_empty() && resource_id != UNKNOWN_RESOURCE {
        lines.push(format!("logos_resource_id: {resource_id}"));
        lines.push(format!(
            "logos_link: {}",
            build_resource_link(resource_id, None)
        ));
    }

    lines.push(format!("synced: {}", Utc::now().format("%Y-%m-%d")));
    lines.push(format!("note_count: {note_count}"));
    lines.push("tags:".to_string());
    lines.push("  - Logos".to_string());
    lines.push("---".to_string());

    lines.join("\n")
}

/// Render note text as a bullet whose interior newlines become two-space
/// continuation lines; blank interior lines are dropped.
fn bullet_lines(text: &str) -> String {
    let mut rendered: Vec<String> = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if index == 0 {
            rendered.push(format!("- {line}"));
        } else if !line.trim().is_empty() {
            rendered.push(format!("  {line}"));
        }
    }
    rendered.join("\n")
}
