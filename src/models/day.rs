//! Day and field-sequence models.
//!
//! A day partitions the tournament's games by calendar date. Within a day,
//! games are kept in two orders: the full chronological order (used by the
//! consecutive-game cap) and one kick-off-ordered sequence per field (used
//! by the first/last-slot penalty and the consecutive-attendance rule).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Games of one field on one day, ordered by kick-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSequence {
    /// Field name.
    pub field: String,
    /// All game ids on this field, by kick-off.
    pub games: Vec<String>,
    /// Same sequence with final games removed.
    pub non_final: Vec<String>,
}

impl FieldSequence {
    /// Opening game of the field.
    pub fn first(&self) -> Option<&str> {
        self.games.first().map(String::as_str)
    }

    /// Closing game of the field.
    pub fn last(&self) -> Option<&str> {
        self.games.last().map(String::as_str)
    }

    /// Number of games on the field.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether the field has no games.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

/// One tournament day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    /// Day index `t` (position in the tournament, starting at 0).
    pub index: usize,
    /// Calendar date.
    pub date: NaiveDate,
    /// Game ids in chronological order (stable for equal kick-offs).
    pub games: Vec<String>,
    /// Per-field sequences, ordered by field name.
    pub fields: Vec<FieldSequence>,
}

impl Day {
    /// Number of games played on this day.
    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Looks up a field sequence by name.
    pub fn field(&self, name: &str) -> Option<&FieldSequence> {
        self.fields.iter().find(|f| f.field == name)
    }

    /// Sliding windows of `size` chronologically consecutive games.
    ///
    /// Yields nothing when the day has fewer than `size` games.
    pub fn windows(&self, size: usize) -> impl Iterator<Item = &[String]> {
        // `slice::windows` panics on 0
        self.games.windows(size.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn sample_day() -> Day {
        Day {
            index: 0,
            date: NaiveDate::from_ymd_opt(2024, 6, 8).unwrap(),
            games: ids(&["a", "b", "c", "d", "e", "f"]),
            fields: vec![
                FieldSequence {
                    field: "Plan 1".into(),
                    games: ids(&["a", "c", "e"]),
                    non_final: ids(&["a", "c"]),
                },
                FieldSequence {
                    field: "Plan 2".into(),
                    games: ids(&["b", "d", "f"]),
                    non_final: ids(&["b", "d", "f"]),
                },
            ],
        }
    }

    #[test]
    fn test_field_first_last() {
        let day = sample_day();
        let f1 = day.field("Plan 1").unwrap();
        assert_eq!(f1.first(), Some("a"));
        assert_eq!(f1.last(), Some("e"));
        assert_eq!(f1.len(), 3);
        assert!(day.field("Plan 9").is_none());
    }

    #[test]
    fn test_windows() {
        let day = sample_day();
        assert_eq!(day.windows(5).count(), 2);
        assert_eq!(day.windows(7).count(), 0);
        assert_eq!(day.game_count(), 6);
    }
}
