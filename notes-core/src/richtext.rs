//! Plain-text extraction from the Logos rich-text markup.
//!
//! Note content and anchor previews arrive as an XML-shaped markup where
//! text-bearing leaf elements carry a `Text` attribute, e.g.
//! `<Run Text="In the beginning "/>`. Extraction walks the element stream
//! and concatenates those attribute values in document order.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Extract plain text from a rich-text payload.
///
/// Absent payload, unparseable markup, or markup without any text-bearing
/// element all yield an empty string; this is a tolerated degraded result,
/// never an error.
pub fn extract_text(markup: Option<&str>) -> String {
    let Some(markup) = markup else {
        return String::new();
    };

    let mut reader = Reader::from_str(markup);
    // Tolerate sloppy markup; only the Text attributes matter.
    reader.config_mut().check_end_names = false;

    let mut out = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(element) | Event::Empty(element)) => {
                push_text_attribute(&element, &mut out);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            // Malformed markup: keep whatever was collected so far.
            Err(_) => break,
        }
    }

    out.trim().to_string()
}

fn push_text_attribute(element: &BytesStart<'_>, out: &mut String) {
    for attribute in element.attributes().flatten() {
        if attribute.key.as_ref() == b"Text" {
            if let Ok(value) = attribute.unescape_value() {
                out.push_str(&value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_payload_is_empty() {
        assert_eq!(extract_text(None), "");
    }

    #[test]
    fn concatenates_runs_in_document_order() {
        assert_eq!(
            extract_text(Some(r#"<Run Text="Hi "/><Run Text="there"/>"#)),
            "Hi there"
        );
    }

    #[test]
    fn reads_nested_elements() {
        let markup = r#"<Paragraph><Run Text="one "/><Span><Run Text="two"/></Span></Paragraph>"#;
        assert_eq!(extract_text(Some(markup)), "one two");
    }

    #[test]
    fn non_markup_payload_is_empty() {
        assert_eq!(extract_text(Some("just plain words")), "");
        assert_eq!(extract_text(Some("")), "");
    }

    #[test]
    fn truncated_markup_does_not_panic() {
        assert_eq!(extract_text(Some(r#"<Run Text="Hi"#)), "");
    }

    #[test]
    fn keeps_text_collected_before_a_malformed_tail() {
        let markup = r#"<Run Text="kept"/><Run Text="lost"#;
        assert_eq!(extract_text(Some(markup)), "kept");
    }

    #[test]
    fn unescapes_entities() {
        assert_eq!(
            extract_text(Some(r#"<Run Text="grace &amp; truth"/>"#)),
            "grace & truth"
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            extract_text(Some(r#"<Run Text="  padded  "/>"#)),
            "padded"
        );
    }

    #[test]
    fn elements_without_text_attribute_contribute_nothing() {
        assert_eq!(
            extract_text(Some(r#"<Field Kind="heading"/><Run Text="body"/>"#)),
            "body"
        );
    }
}
