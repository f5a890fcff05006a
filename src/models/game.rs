//! Game model.
//!
//! A game is one match on one field at one kick-off time. Everything the
//! model builder needs to know about it (how many referees, which minimum
//! level, whether it is a final) is derived once at ingestion and never
//! changes afterwards.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A game to be officiated.
///
/// # Identity
/// `id` is unique within one planning run. The ingestion layer generates it
/// as `"{day_of_month}-{row}"`; callers building games by hand may use any
/// unique string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Unique game identifier.
    pub id: String,
    /// Calendar date.
    pub date: NaiveDate,
    /// Kick-off time.
    pub start: NaiveTime,
    /// Field (pitch) name.
    pub field: String,
    /// Group / category label (e.g. "P12 Pool A", "F14 A-slutspel").
    pub group: String,
    /// Round label (e.g. "Final", "Semifinal").
    pub round: String,
    /// Number of referees the game needs (1 for pool games, 2 otherwise).
    pub required_referees: u32,
    /// Minimum referee level.
    pub required_level: u32,
    /// Whether this is the final match of its category.
    pub is_final: bool,
}

impl Game {
    /// Creates a two-referee game with level requirement 0.
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        start: NaiveTime,
        field: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            start,
            field: field.into(),
            group: String::new(),
            round: String::new(),
            required_referees: 2,
            required_level: 0,
            is_final: false,
        }
    }

    /// Sets the group label.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Sets the round label.
    pub fn with_round(mut self, round: impl Into<String>) -> Self {
        self.round = round.into();
        self
    }

    /// Sets the number of required referees.
    pub fn with_required_referees(mut self, count: u32) -> Self {
        self.required_referees = count;
        self
    }

    /// Sets the minimum referee level.
    pub fn with_required_level(mut self, level: u32) -> Self {
        self.required_level = level;
        self
    }

    /// Marks this game as a final.
    pub fn as_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Whether this is a single-referee pool game.
    ///
    /// The referee count is the defining attribute; the group label is not
    /// consulted. Ingestion sets the count from the pool marker in the
    /// group, so a hand-built game labelled "Pool" that keeps two referees
    /// is treated as a regular game. Pool games are exempt from colleague
    /// lock-step.
    #[inline]
    pub fn is_pool(&self) -> bool {
        self.required_referees == 1
    }

    /// Absolute distance between two kick-offs, in seconds.
    pub fn seconds_apart(&self, other: &Game) -> i64 {
        (self.start - other.start).num_seconds().abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 8).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_game_builder() {
        let g = Game::new("8-0", date(), at(9, 0), "Plan 1")
            .with_group("P12 Pool A")
            .with_round("Gruppspel")
            .with_required_referees(1)
            .with_required_level(2);

        assert_eq!(g.id, "8-0");
        assert_eq!(g.field, "Plan 1");
        assert_eq!(g.required_referees, 1);
        assert_eq!(g.required_level, 2);
        assert!(g.is_pool());
        assert!(!g.is_final);
    }

    #[test]
    fn test_game_defaults_to_two_referees() {
        let g = Game::new("8-1", date(), at(9, 0), "Plan 1").as_final();
        assert_eq!(g.required_referees, 2);
        assert!(!g.is_pool());
        assert!(g.is_final);
    }

    #[test]
    fn test_pool_follows_referee_count_not_group() {
        let labelled = Game::new("8-0", date(), at(9, 0), "Plan 1").with_group("P13 Pool A");
        assert!(!labelled.is_pool());
        assert!(labelled.clone().with_required_referees(1).is_pool());
    }

    #[test]
    fn test_seconds_apart_is_symmetric() {
        let a = Game::new("a", date(), at(9, 0), "Plan 1");
        let b = Game::new("b", date(), at(10, 12), "Plan 2");
        assert_eq!(a.seconds_apart(&b), 72 * 60);
        assert_eq!(b.seconds_apart(&a), 72 * 60);
    }
}
