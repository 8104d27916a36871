//! Lyrics payload parser
//!
//! The backend prints lyrics as LRC-style lines, optionally interleaved with
//! parenthesized translation lines:
//! [00:12.34] Hello world
//! (Bonjour le monde)
//! [00:15.00] Another line
//!
//! Every line is classified on its own; the only carried state is the last
//! timestamp seen, which translation lines borrow for their synced view.

use serde::Serialize;

/// Classification of a single trimmed payload line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `[stamp] text`
    Timestamped { stamp: &'a str, text: &'a str },
    /// `(text)`
    Translation(&'a str),
    /// Blank lines and anything unrecognized
    Other,
}

/// Four derived views of a lyrics payload.
///
/// An empty view is `None`, so "no such content" stays distinguishable from
/// an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedLyrics {
    #[serde(rename = "syncedLrc")]
    pub synced_original: Option<Vec<String>>,
    #[serde(rename = "plainLyrics")]
    pub plain_original: Option<Vec<String>>,
    #[serde(rename = "syncedTr")]
    pub synced_translation: Option<Vec<String>>,
    #[serde(rename = "plainTr")]
    pub plain_translation: Option<Vec<String>>,
}

impl ParsedLyrics {
    /// Parse the raw backend output into its four views
    pub fn parse(content: &str) -> Self {
        let mut synced_original = Vec::new();
        let mut plain_original = Vec::new();
        let mut synced_translation = Vec::new();
        let mut plain_translation = Vec::new();

        let mut last_stamp: Option<&str> = None;

        for line in content.lines() {
            match classify_line(line) {
                LineKind::Timestamped { stamp, text } => {
                    last_stamp = Some(stamp);
                    synced_original.push(format!("[{stamp}] {text}"));
                    plain_original.push(text.to_string());
                }
                LineKind::Translation(text) => {
                    if let Some(stamp) = last_stamp {
                        synced_translation.push(format!("[{stamp}] {text}"));
                    }
                    plain_translation.push(text.to_string());
                }
                LineKind::Other => {}
            }
        }

        Self {
            synced_original: non_empty(synced_original),
            plain_original: non_empty(plain_original),
            synced_translation: non_empty(synced_translation),
            plain_translation: non_empty(plain_translation),
        }
    }
}

fn non_empty(v: Vec<String>) -> Option<Vec<String>> {
    if v.is_empty() { None } else { Some(v) }
}

/// Classify one payload line. Surrounding whitespace is ignored.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let line = line.trim();

    if let Some((stamp, text)) = split_timestamp(line) {
        return LineKind::Timestamped { stamp, text };
    }

    if is_parenthesized(line) {
        let inner = &line[1..line.len() - 1];
        return LineKind::Translation(inner);
    }

    LineKind::Other
}

/// Split `[stamp] text` into its parts. The stamp runs up to the first `]`
/// and may be any token (metadata tags like `[ar:Artist]` included).
pub fn split_timestamp(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(']')?;
    let stamp = &rest[..end];
    let text = rest[end + 1..].trim_start();
    Some((stamp, text))
}

/// True when the whole line is one matching pair of parentheses, e.g.
/// `(Bonjour)` or `(a (b) c)`, but not `(a) (b)`.
pub fn is_parenthesized(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'(' || bytes[bytes.len() - 1] != b')' {
        return false;
    }

    let mut depth = 0usize;
    for (i, b) in bytes.iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth = depth.saturating_sub(1);
                // The opening paren must not close before the last byte.
                if depth == 0 {
                    return i == bytes.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

/// True when the payload carries a line-level timestamp (`[0…]`) anywhere.
pub fn detect_synced(content: &str) -> bool {
    content.lines().any(|l| has_numeric_tag(l, '[', ']'))
}

/// True when the payload carries a word-level timestamp (`<0…>`) anywhere.
pub fn detect_enhanced(content: &str) -> bool {
    content.lines().any(|l| has_numeric_tag(l, '<', '>'))
}

fn has_numeric_tag(line: &str, open: char, close: char) -> bool {
    let mut rest = line;
    while let Some(pos) = rest.find(open) {
        let after = &rest[pos + open.len_utf8()..];
        if after.starts_with(|c: char| c.is_ascii_digit()) && after[1..].contains(close) {
            return true;
        }
        rest = after;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_line() {
        assert_eq!(
            classify_line("  [00:01.00] Hello  "),
            LineKind::Timestamped { stamp: "00:01.00", text: "Hello" }
        );
        assert_eq!(classify_line("(Bonjour)"), LineKind::Translation("Bonjour"));
        assert_eq!(classify_line(""), LineKind::Other);
        assert_eq!(classify_line("just words"), LineKind::Other);
        assert_eq!(classify_line("(a) (b)"), LineKind::Other);
        assert_eq!(classify_line("  ( x )  "), LineKind::Translation(" x "));
    }

    #[test]
    fn test_split_timestamp() {
        assert_eq!(split_timestamp("[00:12.34]First"), Some(("00:12.34", "First")));
        assert_eq!(split_timestamp("[ar:Artist]"), Some(("ar:Artist", "")));
        assert_eq!(split_timestamp("no stamp"), None);
        assert_eq!(split_timestamp("[unterminated"), None);
    }

    #[test]
    fn test_is_parenthesized() {
        assert!(is_parenthesized("(Bonjour)"));
        assert!(is_parenthesized("()"));
        assert!(is_parenthesized("(a (b) c)"));
        assert!(!is_parenthesized("(a) (b)"));
        assert!(!is_parenthesized("(a (b)"));
        assert!(!is_parenthesized("Hello (there)"));
        assert!(!is_parenthesized("("));
    }

    #[test]
    fn test_parse_with_translation() {
        let parsed = ParsedLyrics::parse("[00:01.00] Hello\n(Bonjour)");
        assert_eq!(parsed.synced_original, Some(vec!["[00:01.00] Hello".to_string()]));
        assert_eq!(parsed.plain_original, Some(vec!["Hello".to_string()]));
        assert_eq!(parsed.synced_translation, Some(vec!["[00:01.00] Bonjour".to_string()]));
        assert_eq!(parsed.plain_translation, Some(vec!["Bonjour".to_string()]));
    }

    #[test]
    fn test_parse_without_translation() {
        let lrc = "[00:12.34] First line\n[00:15.00] Second line\n[00:18.00] Third";
        let parsed = ParsedLyrics::parse(lrc);
        let synced = parsed.synced_original.unwrap();
        let plain = parsed.plain_original.unwrap();
        assert_eq!(synced.len(), 3);
        assert_eq!(plain.len(), synced.len());
        assert_eq!(plain[1], "Second line");
        assert!(parsed.synced_translation.is_none());
        assert!(parsed.plain_translation.is_none());
    }

    #[test]
    fn test_translation_before_first_timestamp() {
        let parsed = ParsedLyrics::parse("(Intro)\n[00:01.00] Hello\n(Bonjour)");
        assert_eq!(
            parsed.plain_translation,
            Some(vec!["Intro".to_string(), "Bonjour".to_string()])
        );
        assert_eq!(parsed.synced_translation, Some(vec!["[00:01.00] Bonjour".to_string()]));
    }

    #[test]
    fn test_translation_only_payload() {
        let parsed = ParsedLyrics::parse("(only)");
        assert!(parsed.synced_original.is_none());
        assert!(parsed.plain_original.is_none());
        assert!(parsed.synced_translation.is_none());
        assert_eq!(parsed.plain_translation, Some(vec!["only".to_string()]));
    }

    #[test]
    fn test_unrecognized_lines_dropped() {
        let parsed = ParsedLyrics::parse("plain words\n\n   \nmore words");
        assert_eq!(parsed, ParsedLyrics::default());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let lrc = "[00:01.00] a\n(b)\nc\n[00:02.00] d";
        assert_eq!(ParsedLyrics::parse(lrc), ParsedLyrics::parse(lrc));
    }

    #[test]
    fn test_detect_formats() {
        assert!(detect_synced("[00:01.00] Hello"));
        assert!(!detect_synced("[ar:Artist]\nHello"));
        assert!(!detect_synced("[0 unterminated"));
        assert!(detect_enhanced("[00:01.00] <00:01.00> Hel <00:01.50> lo"));
        assert!(!detect_enhanced("[00:01.00] a <b> c"));
        assert!(!detect_enhanced(""));
    }
}
