//! Assignment (solution) model.
//!
//! The decoded result of a solve: for every game, the ordered list of
//! referees officiating it. A schedule may also carry violations when it is
//! checked against the rules after decoding.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Referees assigned to one game.
///
/// The first referee is the primary, the optional second is the secondary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefereeAssignment {
    /// Assigned game id.
    pub game_id: String,
    /// Referee ids in decode order.
    pub referees: Vec<String>,
}

/// Classification of rule violations in a decoded assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Game has the wrong number of referees.
    Coverage,
    /// Referee is below the game's required level.
    Underqualified,
    /// Referee exceeds the overqualification cap.
    Overqualified,
    /// Referee officiates both games of an unallowed pair.
    Conflict,
    /// Only one member of a colleague pair officiates a non-pool game.
    ColleagueSplit,
    /// Referee officiates more than one final.
    MultipleFinals,
    /// Referee officiates too many games in a consecutive window.
    ConsecutiveCap,
    /// Referee officiates on a day they are unavailable.
    Unavailable,
    /// Assignment names an unknown game or referee.
    UnknownEntity,
}

/// A rule violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity id (game or referee).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

impl RefereeAssignment {
    /// Creates an empty assignment for a game.
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            referees: Vec::new(),
        }
    }

    /// Primary referee.
    pub fn primary(&self) -> Option<&str> {
        self.referees.first().map(String::as_str)
    }

    /// Secondary referee, if the game has two.
    pub fn secondary(&self) -> Option<&str> {
        self.referees.get(1).map(String::as_str)
    }

    /// Whether `referee_id` officiates this game.
    pub fn contains(&self, referee_id: &str) -> bool {
        self.referees.iter().any(|r| r == referee_id)
    }
}

/// Game id → assigned referees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentMap {
    /// Per-game assignments keyed by game id.
    pub games: BTreeMap<String, RefereeAssignment>,
}

impl AssignmentMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `referee_id` to the game's list, preserving insertion order.
    pub fn assign(&mut self, game_id: &str, referee_id: impl Into<String>) {
        self.games
            .entry(game_id.to_string())
            .or_insert_with(|| RefereeAssignment::new(game_id))
            .referees
            .push(referee_id.into());
    }

    /// Assignment for a game.
    pub fn get(&self, game_id: &str) -> Option<&RefereeAssignment> {
        self.games.get(game_id)
    }

    /// Referees assigned to a game (empty if none).
    pub fn referees_for(&self, game_id: &str) -> &[String] {
        self.games
            .get(game_id)
            .map(|a| a.referees.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `referee_id` officiates `game_id`.
    pub fn officiates(&self, referee_id: &str, game_id: &str) -> bool {
        self.games
            .get(game_id)
            .is_some_and(|a| a.contains(referee_id))
    }

    /// Game ids officiated by a referee, in game-id order.
    pub fn games_for_referee(&self, referee_id: &str) -> Vec<&str> {
        self.games
            .values()
            .filter(|a| a.contains(referee_id))
            .map(|a| a.game_id.as_str())
            .collect()
    }

    /// Number of games with at least one referee.
    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Total number of (referee, game) assignments.
    pub fn assignment_count(&self) -> usize {
        self.games.values().map(|a| a.referees.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> AssignmentMap {
        let mut m = AssignmentMap::new();
        m.assign("8-0", "Anna");
        m.assign("8-0", "Bo");
        m.assign("8-1", "Cecilia");
        m.assign("8-2", "Anna");
        m
    }

    #[test]
    fn test_primary_secondary_follow_insertion_order() {
        let m = sample_map();
        let a = m.get("8-0").unwrap();
        assert_eq!(a.primary(), Some("Anna"));
        assert_eq!(a.secondary(), Some("Bo"));

        let b = m.get("8-1").unwrap();
        assert_eq!(b.primary(), Some("Cecilia"));
        assert_eq!(b.secondary(), None);
    }

    #[test]
    fn test_lookups() {
        let m = sample_map();
        assert!(m.officiates("Anna", "8-2"));
        assert!(!m.officiates("Bo", "8-2"));
        assert!(!m.officiates("Anna", "9-9"));
        assert_eq!(m.games_for_referee("Anna"), vec!["8-0", "8-2"]);
        assert!(m.referees_for("9-9").is_empty());
    }

    #[test]
    fn test_counts() {
        let m = sample_map();
        assert_eq!(m.game_count(), 3);
        assert_eq!(m.assignment_count(), 4);
        assert_eq!(AssignmentMap::new().assignment_count(), 0);
    }

    #[test]
    fn test_violation_new() {
        let v = Violation::new(ViolationType::Conflict, "Anna", "8-0 and 8-1 overlap");
        assert_eq!(v.violation_type, ViolationType::Conflict);
        assert_eq!(v.entity_id, "Anna");
    }
}
