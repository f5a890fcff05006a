//! Solution decoding.

use log::trace;

use super::ModelVariables;
use crate::milp::MilpSolution;
use crate::models::{AssignmentMap, Tournament};

/// Reads `officiates` values back into an [`AssignmentMap`].
///
/// A referee officiates a game when the variable exceeds `threshold`.
/// Referees are visited in roster order and games in game order, so the
/// first referee recorded for a game is the one earliest in the roster.
pub fn decode_assignment(
    tournament: &Tournament,
    vars: &ModelVariables,
    solution: &MilpSolution,
    threshold: f64,
) -> AssignmentMap {
    let mut assignment = AssignmentMap::new();
    for (r, referee) in tournament.referees.iter().enumerate() {
        let Some(row) = vars.officiates.get(r) else {
            continue;
        };
        for (g, game) in tournament.games.iter().enumerate() {
            let Some(&var) = row.get(g) else {
                continue;
            };
            if solution.value(var) > threshold {
                trace!("{} -> {}", referee.id, game.id);
                assignment.assign(&game.id, referee.id.clone());
            }
        }
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milp::VarId;
    use crate::models::{Game, Referee};
    use chrono::{NaiveDate, NaiveTime};

    fn tournament() -> Tournament {
        let date = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
        let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        Tournament::new(
            vec![
                Game::new("8-0", date, at(9), "Plan 1"),
                Game::new("8-1", date, at(11), "Plan 1"),
            ],
            vec![
                Referee::new("Anna", 2).available_on_all(1),
                Referee::new("Bo", 2).available_on_all(1),
            ],
        )
    }

    fn vars() -> ModelVariables {
        ModelVariables {
            officiates: vec![vec![VarId(0), VarId(1)], vec![VarId(2), VarId(3)]],
            ..ModelVariables::default()
        }
    }

    #[test]
    fn test_decode_threshold() {
        let solution = MilpSolution {
            values: vec![0.9999, 0.0, 1.0, 0.5],
            objective: 0.0,
        };
        let map = decode_assignment(&tournament(), &vars(), &solution, 0.5);

        assert_eq!(map.referees_for("8-0"), &["Anna", "Bo"]);
        // exactly at the threshold is not assigned
        assert!(map.referees_for("8-1").is_empty());
    }

    #[test]
    fn test_decode_roster_order_sets_primary() {
        let solution = MilpSolution {
            values: vec![1.0, 1.0, 1.0, 1.0],
            objective: 0.0,
        };
        let map = decode_assignment(&tournament(), &vars(), &solution, 0.5);

        let a = map.get("8-1").unwrap();
        assert_eq!(a.primary(), Some("Anna"));
        assert_eq!(a.secondary(), Some("Bo"));
        assert_eq!(map.games_for_referee("Bo").len(), 2);
    }
}
