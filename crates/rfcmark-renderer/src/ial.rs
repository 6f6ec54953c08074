//! Inline attribute lists (IALs).
//!
//! An IAL is a `{#id .class key="value"}` line that annotates the block
//! following it. The renderer queues parsed IALs until the next block emitter
//! that understands attributes takes them.

use std::fmt::Write;

use crate::util::escape_attr;

/// One parsed inline attribute list.
///
/// # Example
///
/// ```
/// use rfcmark_renderer::Ial;
///
/// let ial = Ial::parse(r#"{#fig-1 .wide type="abnf"}"#).unwrap();
/// assert_eq!(ial.id.as_deref(), Some("fig-1"));
/// assert_eq!(ial.classes, vec!["wide"]);
/// assert_eq!(ial.get("type"), Some("abnf"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ial {
    /// Anchor from `#id`.
    pub id: Option<String>,
    /// Classes from `.class`.
    pub classes: Vec<String>,
    /// Key-value attributes in source order.
    pub attrs: Vec<(String, String)>,
}

impl Ial {
    /// Parse a braced attribute list.
    ///
    /// Accepts `{...}` and the `{: ...}` spelling. Returns `None` unless the
    /// whole string is an attribute list with at least one attribute, so
    /// ordinary braced text is never swallowed.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let inner = text.trim().strip_prefix('{')?.strip_suffix('}')?;
        let inner = inner.strip_prefix(':').unwrap_or(inner);

        let mut ial = Self::default();
        let mut remaining = inner.trim();

        while !remaining.is_empty() {
            if let Some(rest) = remaining.strip_prefix('#') {
                let (id, rest) = split_name(rest)?;
                ial.id = Some(id.to_owned());
                remaining = rest;
            } else if let Some(rest) = remaining.strip_prefix('.') {
                let (class, rest) = split_name(rest)?;
                ial.classes.push(class.to_owned());
                remaining = rest;
            } else {
                let (key, value, rest) = parse_key_value(remaining)?;
                ial.attrs.push((key.to_owned(), value.to_owned()));
                remaining = rest;
            }
            remaining = remaining.trim_start();
        }

        if ial.is_empty() { None } else { Some(ial) }
    }

    /// Get an attribute value by key (last occurrence wins).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn is_empty(&self) -> bool {
        self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }
}

/// Render queued IALs as XML attributes, each with a leading space.
///
/// The id becomes `anchor`; key-value pairs are copied through. Classes have
/// no RFC XML counterpart and are not rendered.
#[must_use]
pub fn render_ial(ials: &[Ial]) -> String {
    let mut out = String::new();
    for ial in ials {
        if let Some(id) = &ial.id {
            write!(out, r#" anchor="{}""#, escape_attr(id)).unwrap();
        }
        for (key, value) in &ial.attrs {
            write!(out, r#" {key}="{}""#, escape_attr(value)).unwrap();
        }
    }
    out
}

/// Split a `#id` or `.class` name from the rest of the list.
fn split_name(s: &str) -> Option<(&str, &str)> {
    let end = s
        .find(|c: char| c.is_whitespace() || c == '.' || c == '#')
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    Some((&s[..end], &s[end..]))
}

/// Parse a key-value pair: `key="value"`, `key='value'` or `key=value`.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq_pos = s.find('=')?;
    let key = &s[..eq_pos];

    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':')
    {
        return None;
    }

    let after_eq = &s[eq_pos + 1..];

    if let Some(stripped) = after_eq.strip_prefix('"') {
        let end_quote = stripped.find('"')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else if let Some(stripped) = after_eq.strip_prefix('\'') {
        let end_quote = stripped.find('\'')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else {
        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
        Some((key, &after_eq[..end], &after_eq[end..]))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_id() {
        let ial = Ial::parse("{#my-id}").unwrap();
        assert_eq!(ial.id, Some("my-id".to_owned()));
    }

    #[test]
    fn test_parse_kramdown_colon() {
        let ial = Ial::parse("{: #my-id}").unwrap();
        assert_eq!(ial.id, Some("my-id".to_owned()));
    }

    #[test]
    fn test_parse_classes_compact() {
        let ial = Ial::parse("{.foo.bar}").unwrap();
        assert_eq!(ial.classes, vec!["foo", "bar"]);
    }

    #[test]
    fn test_parse_mixed() {
        let ial = Ial::parse(r#"{#id .c title="Hello World" width=100 alt='x'}"#).unwrap();
        assert_eq!(ial.id.as_deref(), Some("id"));
        assert_eq!(ial.classes, vec!["c"]);
        assert_eq!(
            ial.attrs,
            vec![
                ("title".to_owned(), "Hello World".to_owned()),
                ("width".to_owned(), "100".to_owned()),
                ("alt".to_owned(), "x".to_owned()),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_plain_braces() {
        assert_eq!(Ial::parse("{mainmatter}"), None);
        assert_eq!(Ial::parse("{}"), None);
        assert_eq!(Ial::parse("{ some text }"), None);
        assert_eq!(Ial::parse("#id"), None);
    }

    #[test]
    fn test_parse_rejects_unterminated_quote() {
        assert_eq!(Ial::parse(r#"{title="open}"#), None);
    }

    #[test]
    fn test_get_last_wins() {
        let ial = Ial::parse("{a=1 a=2}").unwrap();
        assert_eq!(ial.get("a"), Some("2"));
        assert_eq!(ial.get("b"), None);
    }

    #[test]
    fn test_render_ial() {
        let ials = vec![
            Ial::parse(r#"{#q1 .ignored}"#).unwrap(),
            Ial::parse(r#"{cite="https://example.com/?a&b"}"#).unwrap(),
        ];
        assert_eq!(
            render_ial(&ials),
            r#" anchor="q1" cite="https://example.com/?a&amp;b""#
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_ial(&[]), "");
    }
}
