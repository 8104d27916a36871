//! Search orchestration: translated attempt, plain fallback, then
//! interpretation of whichever attempt produced lyrics.

use super::parser::{self, ParsedLyrics};
use super::provider::{self, Provider};
use super::translation;
use crate::backend::{BackendError, Invocation, LyricsBackend, RawAttempt, SearchMode};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("{message}")]
    Validation { message: String },
    #[error("No lyrics found for '{query}'")]
    NotFound { query: String },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl SearchError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// A validated search. Providers are always canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    translation: Option<String>,
    providers: Vec<Provider>,
    synced: bool,
    enhanced: bool,
}

impl SearchRequest {
    /// Synced, non-enhanced, any provider, no translation.
    pub fn new(query: impl Into<String>) -> Result<Self, SearchError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(SearchError::validation("Missing required query parameter 'q'."));
        }
        Ok(Self {
            query,
            translation: None,
            providers: Vec::new(),
            synced: true,
            enhanced: false,
        })
    }

    /// An empty language code means no translation.
    pub fn with_translation(mut self, lang: Option<String>) -> Self {
        self.translation = lang.filter(|l| !l.trim().is_empty());
        self
    }

    /// Resolve provider short codes or names; unknown tokens are rejected.
    pub fn with_providers<'a, I>(mut self, tokens: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.providers = Provider::resolve_all(tokens).map_err(|bad| {
            SearchError::validation(format!(
                "Unknown provider '{bad}'. Expected one of: {}",
                Provider::accepted_codes()
            ))
        })?;
        Ok(self)
    }

    pub fn with_synced(mut self, synced: bool) -> Self {
        self.synced = synced;
        self
    }

    pub fn with_enhanced(mut self, enhanced: bool) -> Self {
        self.enhanced = enhanced;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    fn invocation(&self, language: Option<&str>) -> Invocation {
        Invocation {
            query: self.query.clone(),
            language: language.map(str::to_string),
            providers: self.providers.clone(),
            mode: SearchMode::from_synced(self.synced),
            enhanced: self.enhanced,
        }
    }
}

/// Interpreted search outcome, serialized in the service's response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub query: String,
    #[serde(rename = "trLang")]
    pub translation: Option<String>,
    pub providers: Option<Vec<Provider>>,
    /// Detected in the payload, not echoed from the request
    pub synced: bool,
    pub enhanced: bool,
    pub lrc: String,
    pub used_provider: Option<String>,
    pub provider_logs: Vec<String>,
    pub translated: bool,
    /// The translated attempt came back empty and the plain one was used
    pub fallback: bool,
    pub v2: ParsedLyrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt<'a> {
    Translated(&'a str),
    Plain,
}

/// Run one search against `backend`.
///
/// At most two lookups are made, strictly in sequence: the translated one
/// (when a language was requested) and, if it found nothing, a plain one.
pub async fn search<B>(backend: &B, req: &SearchRequest) -> Result<SearchResult, SearchError>
where
    B: LyricsBackend + ?Sized,
{
    let mut state = match req.translation() {
        Some(lang) => Attempt::Translated(lang),
        None => Attempt::Plain,
    };
    let mut fallback = false;

    let raw = loop {
        let raw = match state {
            Attempt::Translated(lang) => backend.invoke(&req.invocation(Some(lang))).await?,
            Attempt::Plain => backend.invoke(&req.invocation(None)).await?,
        };

        match state {
            Attempt::Translated(lang) if raw.stdout.is_empty() => {
                tracing::info!(
                    "[fallback] No results with translation '{lang}', retrying without translation..."
                );
                fallback = true;
                state = Attempt::Plain;
            }
            _ => break raw,
        }
    };

    if raw.stdout.is_empty() {
        return Err(SearchError::NotFound {
            query: req.query.clone(),
        });
    }

    Ok(interpret(req, raw, fallback))
}

/// Build the result from the attempt that produced lyrics.
fn interpret(req: &SearchRequest, raw: RawAttempt, fallback: bool) -> SearchResult {
    let mut info = provider::detect_provider(&raw.diagnostics, &raw.stdout);
    let v2 = ParsedLyrics::parse(&raw.stdout);
    let translated = translation::infer(&raw.stdout, &mut info);

    SearchResult {
        query: req.query.clone(),
        translation: req.translation.clone(),
        providers: (!req.providers.is_empty()).then(|| req.providers.clone()),
        synced: parser::detect_synced(&raw.stdout),
        enhanced: parser::detect_enhanced(&raw.stdout),
        lrc: raw.stdout,
        used_provider: info.name,
        provider_logs: info.logs,
        translated,
        fallback,
        v2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned attempts and records every invocation.
    #[derive(Default)]
    struct ScriptedBackend {
        replies: Mutex<VecDeque<RawAttempt>>,
        calls: Mutex<Vec<Invocation>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<(&str, &str)>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .map(|(stdout, diagnostics)| RawAttempt {
                            stdout: stdout.to_string(),
                            diagnostics: diagnostics.to_string(),
                        })
                        .collect(),
                ),
                calls: Mutex::default(),
            }
        }

        fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LyricsBackend for ScriptedBackend {
        async fn invoke(&self, invocation: &Invocation) -> Result<RawAttempt, BackendError> {
            self.calls.lock().unwrap().push(invocation.clone());
            Ok(self.replies.lock().unwrap().pop_front().unwrap_or_default())
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl LyricsBackend for FailingBackend {
        async fn invoke(&self, _invocation: &Invocation) -> Result<RawAttempt, BackendError> {
            Err(BackendError::Spawn {
                program: "syncedlyrics".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    #[test]
    fn test_request_validation() {
        assert!(matches!(SearchRequest::new("  "), Err(SearchError::Validation { .. })));
        let req = SearchRequest::new("song").unwrap();
        assert!(matches!(req.with_providers(["m", "zz"]), Err(SearchError::Validation { .. })));
    }

    #[test]
    fn test_request_empty_translation_is_none() {
        let req = SearchRequest::new("song").unwrap().with_translation(Some(String::new()));
        assert_eq!(req.translation(), None);
    }

    #[tokio::test]
    async fn test_translated_result() {
        let backend = ScriptedBackend::new(vec![("[00:01.00] Hello\n(Bonjour)", "")]);
        let req = SearchRequest::new("song")
            .unwrap()
            .with_translation(Some("fr".to_string()));

        let res = search(&backend, &req).await.unwrap();

        assert!(res.translated);
        assert!(!res.fallback);
        assert!(res.synced);
        assert!(!res.enhanced);
        assert_eq!(res.used_provider.as_deref(), Some("Musixmatch"));
        assert_eq!(res.v2.synced_translation, Some(vec!["[00:01.00] Bonjour".to_string()]));
        assert_eq!(res.translation.as_deref(), Some("fr"));

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].language.as_deref(), Some("fr"));
    }

    #[tokio::test]
    async fn test_falls_back_to_plain_search() {
        let backend = ScriptedBackend::new(vec![
            ("", "INFO:syncedlyrics:Lyrics found for 'song' on Musixmatch"),
            ("[00:01.00] Hello", "INFO:syncedlyrics:Lyrics found for 'song' on Lrclib"),
        ]);
        let req = SearchRequest::new("song")
            .unwrap()
            .with_translation(Some("fr".to_string()));

        let res = search(&backend, &req).await.unwrap();

        assert!(res.fallback);
        assert!(!res.translated);
        assert_eq!(res.used_provider.as_deref(), Some("Lrclib"));
        assert_eq!(res.provider_logs.len(), 1);
        assert_eq!(res.lrc, "[00:01.00] Hello");

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].language.as_deref(), Some("fr"));
        assert_eq!(calls[1].language, None);
    }

    #[tokio::test]
    async fn test_not_found_after_both_attempts() {
        let backend = ScriptedBackend::new(vec![("", ""), ("", "")]);
        let req = SearchRequest::new("nothing")
            .unwrap()
            .with_translation(Some("fr".to_string()));

        let err = search(&backend, &req).await.unwrap_err();

        assert!(matches!(err, SearchError::NotFound { ref query } if query == "nothing"));
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_single_attempt_without_translation() {
        let backend = ScriptedBackend::new(vec![("", "")]);
        let req = SearchRequest::new("nothing").unwrap();

        assert!(matches!(search(&backend, &req).await, Err(SearchError::NotFound { .. })));
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_invocation_carries_request_flags() {
        let backend = ScriptedBackend::new(vec![("plain lyrics", "")]);
        let req = SearchRequest::new("song")
            .unwrap()
            .with_providers(["g", "genius", "l"])
            .unwrap()
            .with_synced(false)
            .with_enhanced(true);

        let res = search(&backend, &req).await.unwrap();

        let calls = backend.calls();
        assert_eq!(calls[0].providers, vec![Provider::Genius, Provider::Lrclib]);
        assert_eq!(calls[0].mode, SearchMode::PlainOnly);
        assert!(calls[0].enhanced);

        assert_eq!(res.providers, Some(vec![Provider::Genius, Provider::Lrclib]));
        assert!(!res.synced);
        assert!(!res.enhanced);
        assert_eq!(res.v2, ParsedLyrics::default());
    }

    #[tokio::test]
    async fn test_backend_failure_is_not_retried() {
        let req = SearchRequest::new("song")
            .unwrap()
            .with_translation(Some("fr".to_string()));

        let err = search(&FailingBackend, &req).await.unwrap_err();

        assert!(matches!(err, SearchError::Backend(BackendError::Spawn { .. })));
    }

    #[test]
    fn test_result_serialization_shape() {
        let req = SearchRequest::new("song").unwrap();
        let res = interpret(
            &req,
            RawAttempt {
                stdout: "[00:01.00] Hello".to_string(),
                diagnostics: String::new(),
            },
            false,
        );
        let v = serde_json::to_value(&res).unwrap();
        assert_eq!(v["trLang"], serde_json::Value::Null);
        assert_eq!(v["providers"], serde_json::Value::Null);
        assert_eq!(v["v2"]["syncedLrc"][0], "[00:01.00] Hello");
        assert_eq!(v["v2"]["plainTr"], serde_json::Value::Null);
        assert_eq!(v["used_provider"], serde_json::Value::Null);
    }
}
