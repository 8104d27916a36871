//! Lyrics lookup backend
//!
//! The search pipeline only needs raw stdout and diagnostic text from one
//! lookup; `LyricsBackend` is the seam, `SyncedLyricsCli` the real thing.

pub mod cli;

pub use cli::SyncedLyricsCli;

use crate::lyrics::provider::Provider;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    SyncedOnly,
    PlainOnly,
}

impl SearchMode {
    pub fn from_synced(synced: bool) -> Self {
        if synced { Self::SyncedOnly } else { Self::PlainOnly }
    }
}

/// One backend lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub query: String,
    pub language: Option<String>,
    pub providers: Vec<Provider>,
    pub mode: SearchMode,
    pub enhanced: bool,
}

/// Output of one lookup. Both fields are trimmed; an empty `stdout` means
/// nothing was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAttempt {
    pub stdout: String,
    pub diagnostics: String,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} did not finish within {after:?}")]
    Timeout { program: String, after: Duration },
}

#[async_trait]
pub trait LyricsBackend: Send + Sync {
    async fn invoke(&self, invocation: &Invocation) -> Result<RawAttempt, BackendError>;
}
