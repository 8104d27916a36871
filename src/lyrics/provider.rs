//! Lyrics providers known to the backend, and detection of the one that
//! answered a query from the backend's verbose log output.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Provider {
    Musixmatch,
    Lrclib,
    NetEase,
    Megalobiz,
    Genius,
}

/// Short code and canonical name for every provider.
pub const PROVIDER_TABLE: &[(&str, Provider)] = &[
    ("m", Provider::Musixmatch),
    ("l", Provider::Lrclib),
    ("n", Provider::NetEase),
    ("mg", Provider::Megalobiz),
    ("g", Provider::Genius),
];

impl Provider {
    pub fn name(self) -> &'static str {
        match self {
            Provider::Musixmatch => "Musixmatch",
            Provider::Lrclib => "Lrclib",
            Provider::NetEase => "NetEase",
            Provider::Megalobiz => "Megalobiz",
            Provider::Genius => "Genius",
        }
    }

    /// Resolve a short code (`mg`) or a canonical name (`megalobiz`).
    pub fn resolve(token: &str) -> Option<Self> {
        let token = token.trim();
        PROVIDER_TABLE
            .iter()
            .find(|(code, p)| {
                token.eq_ignore_ascii_case(code) || token.eq_ignore_ascii_case(p.name())
            })
            .map(|(_, p)| *p)
    }

    /// Resolve every token, dropping duplicates but keeping first-seen order.
    /// Returns the first token that does not name a provider as the error.
    pub fn resolve_all<'a, I>(tokens: I) -> Result<Vec<Self>, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out = Vec::new();
        for token in tokens {
            let p = Self::resolve(token).ok_or_else(|| token.to_string())?;
            if !out.contains(&p) {
                out.push(p);
            }
        }
        Ok(out)
    }

    /// `m (Musixmatch), l (Lrclib), ...` for error messages and help output.
    pub fn accepted_codes() -> String {
        PROVIDER_TABLE
            .iter()
            .map(|(code, p)| format!("{code} ({})", p.name()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the backend's output says about where the lyrics came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Name as logged by the backend; not necessarily a [`Provider`].
    pub name: Option<String>,
    /// Every `LEVEL:component:message` line, in source order
    pub logs: Vec<String>,
}

const LOG_LEVELS: &[&str] = &["DEBUG", "INFO", "WARNING", "WARN", "ERROR", "CRITICAL"];
const FOUND_PHRASE: &str = "lyrics found for";

/// Scan the diagnostic text, then the payload, for provider information.
/// Log lines are only collected from the diagnostic text.
pub fn detect_provider(diagnostics: &str, payload: &str) -> ProviderInfo {
    let logs = diagnostics.lines().filter_map(log_line).map(str::to_string).collect();

    let name = diagnostics
        .lines()
        .chain(payload.lines())
        .find_map(found_on)
        .map(str::to_string);

    ProviderInfo { name, logs }
}

/// Return the `LEVEL:component:message` part of a line, if it has one.
pub fn log_line(line: &str) -> Option<&str> {
    let line = line.trim();
    for (start, _) in line.char_indices() {
        let candidate = &line[start..];
        for level in LOG_LEVELS {
            if let Some(rest) = candidate.strip_prefix(level)
                && let Some(rest) = rest.strip_prefix(':')
                && let Some((component, _message)) = rest.split_once(':')
                && !component.is_empty()
                && !component.contains(char::is_whitespace)
            {
                return Some(candidate);
            }
        }
    }
    None
}

/// Extract the provider from a "Lyrics found for 'query' on Provider" line.
///
/// The quoted query is skipped so a song title containing "on" cannot be
/// mistaken for the provider.
pub fn found_on(line: &str) -> Option<&str> {
    let lower = line.to_ascii_lowercase();
    let at = lower.find(FOUND_PHRASE)?;
    let mut rest = line[at + FOUND_PHRASE.len()..].trim_start();

    if let Some(quote) = rest.chars().next().filter(|c| *c == '\'' || *c == '"')
        && let Some(close) = rest[1..].rfind(quote)
    {
        rest = &rest[close + 2..];
    }

    let mut words = rest.split_whitespace();
    while let Some(word) = words.next() {
        if word.eq_ignore_ascii_case("on") {
            let next = words.next()?;
            let end = next
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(next.len());
            return (end > 0).then(|| &next[..end]);
        }
    }
    None
}
