//! Normalization of raw note records into the canonical shape.

use notes_core::{NoteKind, ProcessedNote, RawNote, UNKNOWN_RESOURCE, extract_text};
use std::collections::HashMap;
use tracing::debug;

/// Collapse raw records to one canonical note per distinct identity.
///
/// Duplicate identities can arrive from overlapping pages; deduplication
/// keeps the first-seen output position and the last-seen record, making
/// "last write wins" deterministic regardless of map iteration order.
/// Malformed records degrade (empty text, unknown resource) but are never
/// dropped: every distinct input identity yields exactly one output.
pub fn process_notes(notes: Vec<RawNote>) -> Vec<ProcessedNote> {
    let total = notes.len();
    let mut order: Vec<String> = Vec::new();
    let mut by_id: HashMap<String, RawNote> = HashMap::new();

    for note in notes {
        if !by_id.contains_key(&note.id) {
            order.push(note.id.clone());
        }
        by_id.insert(note.id.clone(), note);
    }

    if order.len() < total {
        debug!(
            raw = total,
            unique = order.len(),
            "Collapsed duplicate note identities"
        );
    }

    order
        .into_iter()
        .filter_map(|id| by_id.remove(&id))
        .map(process_note)
        .collect()
}

fn process_note(note: RawNote) -> ProcessedNote {
    let anchor = note.anchors.first();
    let range = anchor.and_then(|a| a.text_range.as_ref());

    // Anchor preview text is the fallback; the note's own content is
    // authoritative whenever it yields anything.
    let preview_text = anchor
        .and_then(|a| a.preview_rich_text.as_deref())
        .map(|markup| extract_text(Some(markup)))
        .unwrap_or_default();
    let content_text = extract_text(note.content.as_deref());
    let text = if content_text.is_empty() {
        preview_text
    } else {
        content_text
    };

    let reference = range
        .and_then(|r| r.reference.as_ref())
        .map(|r| r.display.clone())
        .filter(|display| !display.is_empty());
    let reference_raw = range
        .and_then(|r| r.reference.as_ref())
        .map(|r| r.raw.clone())
        .filter(|raw| !raw.is_empty());
    let resource_id = range
        .map(|r| r.resource_id.clone())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| UNKNOWN_RESOURCE.to_string());
    let resource_title = range
        .and_then(|r| {
            r.resource_full_title
                .clone()
                .or_else(|| r.resource_title.clone())
        })
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNKNOWN_RESOURCE.to_string());
    let color = note
        .style
        .as_ref()
        .and_then(|style| style.color.clone())
        .filter(|color| !color.is_empty());
    let offset = range.and_then(|r| r.offset);

    ProcessedNote {
        id: note.id,
        kind: NoteKind::from_wire(&note.note_kind),
        created: note.created,
        modified: note.modified,
        text,
        reference,
        reference_raw,
        resource_id,
        resource_title,
        color,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes_core::{NoteAnchor, NoteKind, NoteReference, NoteStyle, TextRange};

    fn raw_note(id: &str) -> RawNote {
        RawNote {
            id: id.to_string(),
            ..RawNote::default()
        }
    }

    fn anchored(id: &str, resource_id: &str, preview: &str) -> RawNote {
        RawNote {
            anchors: vec![NoteAnchor {
                preview_rich_text: Some(format!(r#"<Run Text="{preview}"/>"#)),
                text_range: Some(TextRange {
                    resource_id: resource_id.to_string(),
                    resource_title: Some("Short Title".to_string()),
                    resource_full_title: Some("Full Title".to_string()),
                    reference: Some(NoteReference {
                        display: "John 1:1".to_string(),
                        raw: "bible.64.1.1".to_string(),
                    }),
                    offset: Some(42),
                    ..TextRange::default()
                }),
            }],
            ..raw_note(id)
        }
    }

    #[test]
    fn one_output_per_distinct_identity() {
        let notes = vec![
            raw_note("a"),
            raw_note("b"),
            raw_note("a"),
            raw_note("c"),
            raw_note("b"),
        ];
        let processed = process_notes(notes);
        let ids: Vec<&str> = processed.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn last_duplicate_record_wins() {
        let mut first = raw_note("a");
        first.created = "2024-01-01T00:00:00Z".to_string();
        let mut second = raw_note("a");
        second.created = "2024-06-01T00:00:00Z".to_string();

        let processed = process_notes(vec![first, second]);
        assert_eq!(processed.len(), 1);
        assert_eq!(processed[0].created, "2024-06-01T00:00:00Z");
    }

    #[test]
    fn content_overrides_anchor_preview() {
        let mut note = anchored("a", "LLS:1", "preview words");
        note.content = Some(r#"<Run Text="authoritative words"/>"#.to_string());

        let processed = process_notes(vec![note]);
        assert_eq!(processed[0].text, "authoritative words");
    }

    #[test]
    fn empty_content_falls_back_to_preview() {
        let mut note = anchored("a", "LLS:1", "preview words");
        note.content = Some("<Para/>".to_string());

        let processed = process_notes(vec![note]);
        assert_eq!(processed[0].text, "preview words");
    }

    #[test]
    fn anchor_fields_map_through() {
        let mut note = anchored("a", "LLS:29.66.3", "hi");
        note.style = Some(NoteStyle {
            color: Some("yellow".to_string()),
            ..NoteStyle::default()
        });

        let processed = process_notes(vec![note]);
        let p = &processed[0];
        assert_eq!(p.resource_id, "LLS:29.66.3");
        // Full title is preferred over the short one.
        assert_eq!(p.resource_title, "Full Title");
        assert_eq!(p.reference.as_deref(), Some("John 1:1"));
        assert_eq!(p.reference_raw.as_deref(), Some("bible.64.1.1"));
        assert_eq!(p.color.as_deref(), Some("yellow"));
        assert_eq!(p.offset, Some(42));
    }

    #[test]
    fn bare_record_degrades_but_survives() {
        let mut note = raw_note("bare");
        note.note_kind = "highlight".to_string();

        let processed = process_notes(vec![note]);
        let p = &processed[0];
        assert_eq!(p.id, "bare");
        assert_eq!(p.kind, NoteKind::Highlight);
        assert_eq!(p.text, "");
        assert_eq!(p.resource_id, UNKNOWN_RESOURCE);
        assert_eq!(p.resource_title, UNKNOWN_RESOURCE);
        assert!(p.reference.is_none());
        assert!(p.color.is_none());
        assert!(p.offset.is_none());
    }

    #[test]
    fn only_the_first_anchor_is_consulted() {
        let mut note = anchored("a", "LLS:first", "first anchor");
        note.anchors.push(NoteAnchor {
            preview_rich_text: Some(r#"<Run Text="second anchor"/>"#.to_string()),
            text_range: Some(TextRange {
                resource_id: "LLS:second".to_string(),
                ..TextRange::default()
            }),
        });

        let processed = process_notes(vec![note]);
        assert_eq!(processed[0].resource_id, "LLS:first");
        assert_eq!(processed[0].text, "first anchor");
    }
}
