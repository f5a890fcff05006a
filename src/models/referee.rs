//! Referee and colleague-pair models.

use serde::{Deserialize, Serialize};

/// A referee that can be assigned to games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referee {
    /// Unique referee identifier (the referee's name).
    pub id: String,
    /// Qualification rank (higher = more senior).
    pub level: u32,
    /// Availability per day index (`true` = available that day).
    pub availability: Vec<bool>,
}

impl Referee {
    /// Creates a referee with no availability entries.
    pub fn new(id: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            level,
            availability: Vec::new(),
        }
    }

    /// Sets the per-day availability flags.
    pub fn with_availability(mut self, availability: Vec<bool>) -> Self {
        self.availability = availability;
        self
    }

    /// Marks the referee available on each of `days` days.
    pub fn available_on_all(mut self, days: usize) -> Self {
        self.availability = vec![true; days];
        self
    }

    /// Whether the referee is available on day `t`.
    ///
    /// Days beyond the availability vector count as unavailable.
    #[inline]
    pub fn is_available(&self, t: usize) -> bool {
        self.availability.get(t).copied().unwrap_or(false)
    }

    /// Whether the referee may officiate a game requiring `required_level`
    /// without exceeding the overqualification cap.
    #[inline]
    pub fn is_qualified_for(&self, required_level: u32, overqualification_cap: u32) -> bool {
        self.level >= required_level && self.level - required_level <= overqualification_cap
    }
}

/// Two referees that must work every non-pool game together.
///
/// Stored in canonical order (`first <= second`) so `(A, B)` and `(B, A)`
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColleaguePair {
    /// Lexicographically smaller referee id.
    pub first: String,
    /// Lexicographically larger referee id.
    pub second: String,
}

impl ColleaguePair {
    /// Creates a canonical pair.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Whether the pair names the same referee twice.
    pub fn is_self_pair(&self) -> bool {
        self.first == self.second
    }

    /// Whether `referee_id` is one of the two members.
    pub fn contains(&self, referee_id: &str) -> bool {
        self.first == referee_id || self.second == referee_id
    }

    /// Both members, in canonical order.
    pub fn members(&self) -> [&str; 2] {
        [&self.first, &self.second]
    }
}
