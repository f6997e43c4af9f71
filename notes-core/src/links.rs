//! Deep links back into Logos resources.
//!
//! Two link shapes exist: a plain `logosres:` open-resource URI, and a
//! `logos4:Search` URI that lands inside the resource at a given phrase.
//! The search template requires `|` and `=` to appear as `$7C` and `$3D`
//! inside the query component.

use crate::types::UNKNOWN_RESOURCE;

/// Longest search phrase embedded in a link, in characters.
const MAX_QUERY_CHARS: usize = 50;

/// Shortest acceptable phrase after backing up to a word boundary.
const MIN_QUERY_CHARS: usize = 10;

/// Build a URI into the given resource, optionally anchored at a phrase.
///
/// Returns an empty string when the resource id is absent or unknown.
pub fn build_resource_link(resource_id: &str, search_text: Option<&str>) -> String {
    if resource_id.is_empty() || resource_id == UNKNOWN_RESOURCE {
        return String::new();
    }

    if let Some(search) = search_text.filter(|text| !text.trim().is_empty()) {
        // Exact-phrase search scoped to this resource.
        let quoted = format!("\"{}\"", clamp_to_word_boundary(search));
        let encoded = urlencoding::encode(&quoted);
        return format!(
            "logos4:Search;kind=BasicSearch;q={encoded};syntax=v2;in=raw:Single$7CResourceId$3D{resource_id}"
        );
    }

    let clean_id = resource_id.strip_prefix("LLS:").unwrap_or(resource_id);
    format!("logosres:{clean_id}")
}

/// Take the leading `MAX_QUERY_CHARS` characters of `text`; when the cut
/// lands inside a word, back up to the preceding word boundary unless that
/// boundary sits within the first `MIN_QUERY_CHARS` characters.
fn clamp_to_word_boundary(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut query: String = chars
        .iter()
        .take(MAX_QUERY_CHARS)
        .collect::<String>()
        .trim()
        .to_string();

    let cut_mid_word = chars
        .get(MAX_QUERY_CHARS)
        .is_some_and(|next| !next.is_whitespace());
    if cut_mid_word {
        if let Some(last_space) = query.rfind(' ') {
            if last_space > MIN_QUERY_CHARS {
                query.truncate(last_space);
            }
        }
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_link_strips_namespace_prefix() {
        assert_eq!(build_resource_link("LLS:1234", None), "logosres:1234");
    }

    #[test]
    fn plain_link_keeps_unprefixed_ids() {
        assert_eq!(build_resource_link("BK.210", None), "logosres:BK.210");
    }

    #[test]
    fn unknown_resource_yields_no_link() {
        assert_eq!(build_resource_link("Unknown", None), "");
        assert_eq!(build_resource_link("", Some("text")), "");
    }

    #[test]
    fn search_link_is_quoted_and_encoded() {
        let link = build_resource_link("LLS:1.0.71", Some("For God so loved"));
        assert_eq!(
            link,
            "logos4:Search;kind=BasicSearch;q=%22For%20God%20so%20loved%22;syntax=v2;in=raw:Single$7CResourceId$3DLLS:1.0.71"
        );
    }

    #[test]
    fn blank_search_text_falls_back_to_plain_link() {
        assert_eq!(build_resource_link("LLS:1234", Some("   ")), "logosres:1234");
    }

    #[test]
    fn long_phrase_backs_up_to_word_boundary() {
        // 50-char cut lands inside "beginning"; expect the phrase to stop
        // at the previous word boundary.
        let text = "In the beginning God created the heavens and beginning of more";
        let clamped = clamp_to_word_boundary(text);
        assert_eq!(clamped, "In the beginning God created the heavens and");
    }

    #[test]
    fn early_boundary_is_not_used() {
        // Only one space, within the first ten characters: keep the raw cut
        // rather than collapsing to a near-empty phrase.
        let text = "Jesus wept.and-then-a-very-long-unbroken-token-continues-here";
        let clamped = clamp_to_word_boundary(text);
        let expected: String = text.chars().take(50).collect::<String>().trim().to_string();
        assert_eq!(clamped, expected);
    }

    #[test]
    fn short_phrase_is_untouched() {
        assert_eq!(clamp_to_word_boundary("short phrase"), "short phrase");
    }
}
