//! Lyrics search pipeline
//!
//! This module provides:
//! - Parsing of the backend's LRC/translation payload into four views
//! - Provider detection from the backend's verbose logs
//! - Translation inference
//! - The search orchestrator with its translated -> plain fallback

pub mod parser;
pub mod provider;
pub mod search;
pub mod translation;

pub use parser::ParsedLyrics;
pub use provider::{Provider, ProviderInfo};
pub use search::{SearchError, SearchRequest, SearchResult, search};
