//! Whether a freshly aggregated place set may be cached.
//!
//! A set merged from a round where any provider failed is incomplete. Caching
//! it would keep serving the gap until the entry expires, so such rounds are
//! never written. Empty sets are not written either.

use super::fetch::ProviderFetchOutcome;
use crate::domain::Place;

/// Outcome of the cache-write policy for one aggregation round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheWriteDecision {
    /// Every provider succeeded and the set is non-empty.
    Write,
    /// At least one provider failed; the named providers are listed.
    SkipProviderFailure { failed_providers: Vec<String> },
    /// All providers succeeded but nothing was found.
    SkipEmpty,
}

impl CacheWriteDecision {
    /// Decide for `places` aggregated from `outcomes`.
    ///
    /// Provider failure takes precedence over emptiness.
    #[must_use]
    pub fn decide(outcomes: &[ProviderFetchOutcome], places: &[Place]) -> Self {
        let failed_providers: Vec<String> = outcomes
            .iter()
            .filter(|outcome| !outcome.success)
            .map(|outcome| outcome.provider.clone())
            .collect();

        if !failed_providers.is_empty() {
            Self::SkipProviderFailure { failed_providers }
        } else if places.is_empty() {
            Self::SkipEmpty
        } else {
            Self::Write
        }
    }
}
