//! Conflict and grouping precomputation.
//!
//! Derives, once per run, everything the model builder needs to know about
//! the shape of the schedule:
//!
//! - **Unallowed pairs**: games that cannot share a referee (different
//!   fields, kick-offs within the conflict window).
//! - **Days**: per-day chronological order and per-field sequences, with
//!   and without finals.
//! - **Finals**: the set of final games.
//!
//! The result is plain data and stays valid even when the later solve
//! fails, so it travels inside [`PlanError::NoSolution`](crate::PlanError).

mod conflicts;
mod grouping;

pub use conflicts::{day_conflicts, unallowed_pairs};
pub use grouping::{build_day, chronological, finals};

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::PlannerConfig;
use crate::models::{Day, Game, Tournament, UnallowedPairs};

/// Output of the precomputation step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Precomputed {
    /// One entry per tournament day, in day order.
    pub days: Vec<Day>,
    /// Deduplicated conflicts.
    pub unallowed_pairs: UnallowedPairs,
    /// Ids of final games.
    pub finals: BTreeSet<String>,
}

impl Precomputed {
    /// Day `t`.
    pub fn day(&self, t: usize) -> Option<&Day> {
        self.days.get(t)
    }

    /// Whether a game is a final.
    pub fn is_final(&self, game_id: &str) -> bool {
        self.finals.contains(game_id)
    }
}

/// Runs the precomputation for a (validated) tournament.
pub fn precompute(tournament: &Tournament, config: &PlannerConfig) -> Precomputed {
    let per_day: Vec<Vec<&Game>> = (0..tournament.day_count())
        .map(|t| tournament.games_on_day(t))
        .collect();

    let days: Vec<Day> = tournament
        .days
        .iter()
        .zip(&per_day)
        .enumerate()
        .map(|(t, (date, games))| build_day(t, *date, games))
        .collect();

    let unallowed = unallowed_pairs(per_day, config.conflict_window_seconds());
    info!("Number of unallowed pairs: {}", unallowed.len());

    Precomputed {
        days,
        unallowed_pairs: unallowed,
        finals: finals(&tournament.games),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Referee, UnallowedPair};
    use chrono::{NaiveDate, NaiveTime};

    fn game(id: &str, day: u32, h: u32, m: u32, field: &str) -> Game {
        Game::new(
            id,
            NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            field,
        )
    }

    #[test]
    fn test_precompute_two_days() {
        let tour = Tournament::new(
            vec![
                game("8-0", 8, 9, 0, "Plan 1"),
                game("8-1", 8, 9, 30, "Plan 2"),
                // same kick-off as 8-0, another day
                game("9-0", 9, 9, 0, "Plan 1"),
                game("9-1", 9, 14, 0, "Plan 2").as_final(),
            ],
            vec![Referee::new("Anna", 3).available_on_all(2)],
        );
        let pre = precompute(&tour, &PlannerConfig::default());

        assert_eq!(pre.days.len(), 2);
        assert_eq!(pre.day(0).unwrap().games, vec!["8-0", "8-1"]);
        assert_eq!(pre.day(1).unwrap().fields.len(), 2);
        assert!(pre.day(2).is_none());

        assert_eq!(pre.unallowed_pairs.len(), 1);
        assert!(pre.unallowed_pairs.contains(&UnallowedPair::new("8-0", "8-1")));

        assert!(pre.is_final("9-1"));
        assert!(!pre.is_final("9-0"));
    }

    #[test]
    fn test_games_on_other_days_never_conflict() {
        let tour = Tournament::new(
            vec![
                game("8-0", 8, 9, 0, "Plan 1"),
                game("9-0", 9, 9, 0, "Plan 2"),
            ],
            vec![],
        );
        let pre = precompute(&tour, &PlannerConfig::default());
        assert!(pre.unallowed_pairs.is_empty());
    }
}
