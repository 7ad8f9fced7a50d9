//! Message text normalization.
//!
//! Telegram Desktop exports the `text` field of a message either as a plain
//! string or as an array mixing raw strings with styled span objects
//! (`{"type": "bold", "text": "..."}`). [`normalize_text`] collapses both
//! shapes into a single plain string so character counts compare across
//! messages.

use serde::{Deserialize, Serialize};

/// Placeholder substituted for link spans when link replacement is enabled.
///
/// URLs are long and would skew character counts toward link-heavy chats.
pub const LINK_PLACEHOLDER: &str = "<<link>>";

/// The `text` field of an exported message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    /// A bare string, the common case
    Plain(String),
    /// A sequence of plain and styled fragments
    Spans(Vec<TextSpan>),
}

impl Default for TextValue {
    fn default() -> Self {
        TextValue::Plain(String::new())
    }
}

impl From<&str> for TextValue {
    fn from(s: &str) -> Self {
        TextValue::Plain(s.to_string())
    }
}

/// One element of a span sequence.
///
/// Styled spans may carry extra attributes (e.g. `href` on text links);
/// everything beyond the type tag and literal text is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextSpan {
    /// A raw string between styled fragments
    Plain(String),
    /// A styled fragment with a type tag
    Styled {
        /// Span type as written by the exporter ("link", "bold", ...)
        #[serde(rename = "type")]
        kind: String,
        /// Literal text of the span
        text: String,
    },
}

/// Collapses a message's text value into a single plain string.
///
/// A plain-string value is returned unchanged. For a span sequence, plain
/// elements pass through verbatim and styled spans are replaced by their
/// literal text, except spans of type `"link"` which become
/// [`LINK_PLACEHOLDER`] when `replace_links` is set. Elements are joined
/// with a single space.
///
/// This function is pure; it never fails.
///
/// # Examples
///
/// ```
/// use tgstat::text::{TextSpan, TextValue, normalize_text};
///
/// let value = TextValue::Spans(vec![
///     TextSpan::Plain("see".into()),
///     TextSpan::Styled { kind: "link".into(), text: "https://example.com".into() },
/// ]);
/// assert_eq!(normalize_text(&value, true), "see <<link>>");
/// assert_eq!(normalize_text(&value, false), "see https://example.com");
/// ```
pub fn normalize_text(value: &TextValue, replace_links: bool) -> String {
    match value {
        TextValue::Plain(s) => s.clone(),
        TextValue::Spans(spans) => spans
            .iter()
            .map(|span| match span {
                TextSpan::Plain(s) => s.as_str(),
                TextSpan::Styled { kind, text } => {
                    if replace_links && kind == "link" {
                        LINK_PLACEHOLDER
                    } else {
                        text.as_str()
                    }
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}
