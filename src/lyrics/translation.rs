//! Translation inference
//!
//! Translated payloads interleave parenthesized lines with the original
//! lyrics. Only Musixmatch serves translations, so a translated payload
//! without a logged provider is attributed to it.

use super::parser::is_parenthesized;
use super::provider::{Provider, ProviderInfo};

/// Provider assumed for translated payloads when none was logged.
pub const TRANSLATING_PROVIDER: Provider = Provider::Musixmatch;

/// True when any trimmed line of the payload is fully parenthesized.
pub fn is_translated(content: &str) -> bool {
    content.lines().any(|l| is_parenthesized(l.trim()))
}

/// Decide `translated` and fill in the provider name when it is implied.
pub fn infer(content: &str, info: &mut ProviderInfo) -> bool {
    let translated = is_translated(content);
    if translated && info.name.is_none() {
        info.name = Some(TRANSLATING_PROVIDER.name().to_string());
    }
    translated
}
