use serde::{Deserialize, Serialize};

/// Sentinel used when a note carries no usable resource id or title.
pub const UNKNOWN_RESOURCE: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Highlight,
    #[default]
    Note,
}

impl NoteKind {
    /// Map the wire discriminator; unknown kinds degrade to plain notes.
    pub fn from_wire(kind: &str) -> Self {
        match kind {
            "highlight" => Self::Highlight,
            _ => Self::Note,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Highlight => "highlight",
            Self::Note => "note",
        }
    }
}

/// A note record exactly as the notes endpoint returns it.
///
/// Every field beyond `id` is defaulted on deserialization: a malformed
/// record degrades to an empty shape instead of failing the whole page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNote {
    pub id: String,
    #[serde(default)]
    pub revision: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub modified: String,
    #[serde(default)]
    pub is_trashed: bool,
    #[serde(default)]
    pub is_deleted: bool,
    /// Wire discriminator (`highlight` | `note`); mapped to [`NoteKind`]
    /// during normalization so unknown values degrade instead of failing.
    #[serde(default)]
    pub note_kind: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub anchors: Vec<NoteAnchor>,
    #[serde(default)]
    pub style: Option<NoteStyle>,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteAnchor {
    #[serde(default)]
    pub preview_rich_text: Option<String>,
    #[serde(default)]
    pub text_range: Option<TextRange>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    #[serde(default)]
    pub resource_id: String,
    #[serde(default)]
    pub resource_title: Option<String>,
    #[serde(default)]
    pub resource_full_title: Option<String>,
    #[serde(default)]
    pub reference: Option<NoteReference>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub length: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteReference {
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub raw: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteStyle {
    #[serde(default)]
    pub indicator: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub highlight: String,
    #[serde(default)]
    pub markup_style: String,
}

/// Canonical note shape the rest of the pipeline works with.
///
/// `created` and `modified` are ISO-8601 strings compared lexically.
/// The notes endpoint emits a single zero-padded format, so lexical order
/// equals chronological order; nothing here re-derives or re-formats them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedNote {
    pub id: String,
    pub kind: NoteKind,
    pub created: String,
    pub modified: String,
    pub text: String,
    pub reference: Option<String>,
    pub reference_raw: Option<String>,
    pub resource_id: String,
    pub resource_title: String,
    pub color: Option<String>,
    pub offset: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_note_tolerates_sparse_records() {
        let note: RawNote = serde_json::from_str(r#"{"id":"n1"}"#).unwrap();
        assert_eq!(note.id, "n1");
        assert_eq!(note.note_kind, "");
        assert!(note.anchors.is_empty());
        assert!(note.content.is_none());
    }

    #[test]
    fn note_kind_maps_wire_values() {
        assert_eq!(NoteKind::from_wire("highlight"), NoteKind::Highlight);
        assert_eq!(NoteKind::from_wire("note"), NoteKind::Note);
        // Unknown discriminators degrade to plain notes.
        assert_eq!(NoteKind::from_wire("scribble"), NoteKind::Note);
        assert_eq!(NoteKind::Highlight.as_str(), "highlight");
    }

    #[test]
    fn raw_note_parses_full_record() {
        let json = r#"{
            "id": "abc",
            "revision": "3",
            "created": "2024-01-02T03:04:05Z",
            "createdBy": "user-1",
            "modified": "2024-02-02T03:04:05Z",
            "isTrashed": false,
            "isDeleted": false,
            "noteKind": "highlight",
            "content": "<Run Text=\"hi\"/>",
            "anchors": [{
                "previewRichText": "<Run Text=\"preview\"/>",
                "textRange": {
                    "resourceId": "LLS:1.0.4",
                    "resourceTitle": "Short",
                    "resourceFullTitle": "The Full Title",
                    "reference": {"display": "John 3:16", "raw": "bible.64.3.16"},
                    "version": "1",
                    "offset": 1234,
                    "length": 40
                }
            }],
            "style": {"indicator": "highlight", "color": "yellow", "highlight": "", "markupStyle": ""},
            "role": "owner"
        }"#;
        let note: RawNote = serde_json::from_str(json).unwrap();
        let range = note.anchors[0].text_range.as_ref().unwrap();
        assert_eq!(range.resource_full_title.as_deref(), Some("The Full Title"));
        assert_eq!(range.offset, Some(1234));
        assert_eq!(note.style.unwrap().color.as_deref(), Some("yellow"));
    }
}
