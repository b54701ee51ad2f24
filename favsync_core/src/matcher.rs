//! Candidate selection by the duration-window heuristic

use crate::track::SearchCandidate;

/// Default lower bound of the duration window in seconds, exclusive.
pub const DEFAULT_MIN_DURATION_SECS: u32 = 60;

/// Default upper bound of the duration window in seconds, exclusive.
pub const DEFAULT_MAX_DURATION_SECS: u32 = 600;

/// Picks the first search candidate whose length looks like a full song.
///
/// Candidates arrive relevance-ranked from the platform, so the first one
/// strictly inside the window wins. Anything at or below the lower bound is
/// assumed to be a snippet, anything at or above the upper bound a
/// compilation or full album upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationMatcher {
    /// Exclusive lower bound in seconds.
    pub min_secs: u32,
    /// Exclusive upper bound in seconds.
    pub max_secs: u32,
}

impl Default for DurationMatcher {
    fn default() -> Self {
        Self {
            min_secs: DEFAULT_MIN_DURATION_SECS,
            max_secs: DEFAULT_MAX_DURATION_SECS,
        }
    }
}

impl DurationMatcher {
    /// Create a matcher with a custom window. Both bounds stay exclusive.
    pub fn new(min_secs: u32, max_secs: u32) -> Self {
        Self { min_secs, max_secs }
    }

    /// Whether a duration falls strictly inside the window.
    pub fn accepts(&self, duration_secs: u32) -> bool {
        duration_secs > self.min_secs && duration_secs < self.max_secs
    }

    /// First acceptable candidate in input order, or `None` when the set is
    /// empty or nothing fits the window. Callers treat both the same way, as
    /// a match failure.
    pub fn select<'a>(&self, candidates: &'a [SearchCandidate]) -> Option<&'a SearchCandidate> {
        candidates
            .iter()
            .find(|candidate| self.accepts(candidate.duration_secs))
    }
}
