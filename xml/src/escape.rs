//! Escaping for character data and attribute values.

use std::borrow::Cow;

/// Escapes `&`, `<` and `>` for use as element character data.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
#[must_use]
pub fn escape_text(text: &str) -> Cow<'_, str> {
    escape(text, false)
}

/// Escapes `&`, `<`, `>`, `"` and line breaks for use inside a double-quoted
/// attribute value.
#[must_use]
pub fn escape_attribute(text: &str) -> Cow<'_, str> {
    escape(text, true)
}

fn escape(text: &str, attribute: bool) -> Cow<'_, str> {
    let needs = |c: char| {
        matches!(c, '&' | '<' | '>') || (attribute && matches!(c, '"' | '\n' | '\r' | '\t'))
    };
    if !text.chars().any(needs) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\r' if attribute => out.push_str("&#13;"),
            '\t' if attribute => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Replaces predefined entities and character references with the
/// characters they denote.
pub(crate) fn unescape(raw: &str) -> Result<Cow<'_, str>, crate::XmlError> {
    if !raw.contains('&') {
        return Ok(Cow::Borrowed(raw));
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find(';') else {
            return Err(crate::XmlError::UnknownEntity(
                after.chars().take(16).collect(),
            ));
        };
        out.push(resolve_entity(&after[..end])?);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(Cow::Owned(out))
}

fn resolve_entity(entity: &str) -> Result<char, crate::XmlError> {
    let resolved = match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()
            } else {
                entity.strip_prefix('#').and_then(|dec| dec.parse().ok())
            };
            code.and_then(char::from_u32)
        }
    };
    resolved.ok_or_else(|| crate::XmlError::UnknownEntity(entity.to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(escape_text("ConnectivityNode"), Cow::Borrowed(_)));
    }

    #[test]
    fn markup_characters_are_escaped() {
        assert_eq!(escape_text("a < b && c"), "a &lt; b &amp;&amp; c");
        assert_eq!(escape_attribute("say \"hi\""), "say &quot;hi&quot;");
        assert_eq!(escape_text("say \"hi\""), "say \"hi\"");
    }

    #[test]
    fn entities_and_character_references_resolve() {
        assert_eq!(unescape("&lt;x&gt; &amp; &#65;&#x42;").unwrap(), "<x> & AB");
    }

    #[test]
    fn unknown_entity_is_rejected() {
        assert!(matches!(
            unescape("&nbsp;"),
            Err(crate::XmlError::UnknownEntity(name)) if name == "nbsp"
        ));
        assert!(unescape("&amp").is_err());
    }
}
