//! Game-pair conflicts.
//!
//! An unallowed pair is two games that cannot share a referee because they
//! are on different fields and kick off too close together for the referee
//! to move between them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Two games that cannot be officiated by the same referee.
///
/// Stored in canonical order (`first < second` by game id), so the same
/// conflict discovered as `(A, B)` and `(B, A)` collapses to one entry in a
/// set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnallowedPair {
    /// Smaller game id.
    pub first: String,
    /// Larger game id.
    pub second: String,
}

impl UnallowedPair {
    /// Creates a canonical pair.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Whether `game_id` is one of the two games.
    pub fn involves(&self, game_id: &str) -> bool {
        self.first == game_id || self.second == game_id
    }
}

/// Deduplicated set of conflicts.
pub type UnallowedPairs = BTreeSet<UnallowedPair>;

/// Normalises and deduplicates raw (possibly ordered, possibly repeated)
/// conflict pairs.
pub fn dedupe_pairs<I, A, B>(pairs: I) -> UnallowedPairs
where
    I: IntoIterator<Item = (A, B)>,
    A: Into<String>,
    B: Into<String>,
{
    pairs
        .into_iter()
        .map(|(a, b)| UnallowedPair::new(a, b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_canonical_order() {
        let p = UnallowedPair::new("8-3", "8-1");
        assert_eq!(p.first, "8-1");
        assert_eq!(p.second, "8-3");
        assert!(p.involves("8-3"));
        assert!(!p.involves("8-2"));
    }

    #[test]
    fn test_dedupe_collapses_reversed_pairs() {
        let set = dedupe_pairs(vec![("a", "b"), ("b", "a"), ("a", "c"), ("a", "b")]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let once = dedupe_pairs(vec![("x", "y"), ("y", "x"), ("z", "x")]);
        let twice = dedupe_pairs(
            once.iter()
                .map(|p| (p.first.clone(), p.second.clone()))
                .chain(once.iter().map(|p| (p.second.clone(), p.first.clone()))),
        );
        assert_eq!(once, twice);
    }
}
