//! RDF/XML instance documents.
//!
//! [`to_string`] writes a [`Document`](crate::Document) as an `rdf:RDF`
//! element with one child per member, properties in declaration order.
//! [`from_str`] reads such a document back into a session in two passes:
//! every top-level element is constructed first, so references resolve
//! regardless of element order.

mod reader;
mod writer;

pub use reader::{from_slice, from_str, read_document};
pub use writer::{to_string, write_document};

/// Maps a URI under `base` to its fragment form (`"#id"`); other URIs are
/// returned unchanged.
pub(crate) fn normalize_uri(raw: &str, base: Option<&str>) -> String {
    if raw.starts_with('#') {
        return raw.to_owned();
    }
    if let Some(base) = base {
        let base = base.trim_end_matches('#');
        if let Some(fragment) = raw.strip_prefix(base).and_then(|rest| rest.strip_prefix('#')) {
            return format!("#{fragment}");
        }
    }
    raw.to_owned()
}

#[cfg(test)]
mod tests {
    use super::normalize_uri;

    #[test]
    fn uris_under_the_base_become_fragments() {
        let base = Some("http://example.com/grid");
        assert_eq!(normalize_uri("#_a", base), "#_a");
        assert_eq!(normalize_uri("http://example.com/grid#_a", base), "#_a");
        assert_eq!(
            normalize_uri("http://example.com/grid#_a", Some("http://example.com/grid#")),
            "#_a"
        );
        assert_eq!(normalize_uri("urn:uuid:42", base), "urn:uuid:42");
        assert_eq!(
            normalize_uri("http://example.com/other#_a", base),
            "http://example.com/other#_a"
        );
    }
}
