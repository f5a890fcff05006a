//! Run diagnostics.
//!
//! Summarises a solved run for reporting: model size, objective, and how
//! far each referee's daily load ended up from the day's target.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Unallowed pairs | Precomputed conflicting game pairs |
//! | Variables / constraints | Model size, constraints per family |
//! | Objective | Σ deviations + W · Σ first/last flags |
//! | Deviation | `above − below` per referee and day |

use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::builder::RefereeModel;
use crate::milp::MilpSolution;
use crate::models::Tournament;
use crate::precompute::Precomputed;

/// Load of one referee on one day against the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadDeviation {
    pub referee: String,
    pub day: usize,
    /// Games officiated that day.
    pub assigned: usize,
    /// Target games per referee that day.
    pub target: f64,
    /// Games above the target.
    pub above: f64,
    /// Games below the target.
    pub below: f64,
}

impl LoadDeviation {
    /// Signed deviation (`assigned − target`).
    pub fn signed(&self) -> f64 {
        self.above - self.below
    }

    /// Absolute deviation.
    pub fn magnitude(&self) -> f64 {
        self.above + self.below
    }
}

/// Diagnostics of one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Number of precomputed unallowed pairs.
    pub unallowed_pairs: usize,
    /// Number of model variables.
    pub variables: usize,
    /// Number of model constraints.
    pub constraints: usize,
    /// Constraint count per family name.
    pub constraints_by_family: BTreeMap<String, usize>,
    /// Objective value.
    pub objective: f64,
    /// Per referee and day, roster order then day order.
    pub deviations: Vec<LoadDeviation>,
    /// Referee-days flagged with both an opening and a closing slot.
    pub first_last_flags: usize,
}

impl Diagnostics {
    /// Computes diagnostics from a solved model.
    ///
    /// Binary values count as set above `threshold`, the same boundary the
    /// decoder uses, so `assigned` agrees with the decoded assignment.
    pub fn calculate(
        tournament: &Tournament,
        pre: &Precomputed,
        built: &RefereeModel,
        solution: &MilpSolution,
        threshold: f64,
    ) -> Self {
        let mut deviations = Vec::new();
        let mut first_last_flags = 0;

        for (r, referee) in tournament.referees.iter().enumerate() {
            for day in &pre.days {
                let t = day.index;
                let assigned = tournament
                    .games
                    .iter()
                    .enumerate()
                    .filter(|(_, g)| day.games.contains(&g.id))
                    .filter(|&(g, _)| solution.value(built.vars.officiates[r][g]) > threshold)
                    .count();
                let dev = LoadDeviation {
                    referee: referee.id.clone(),
                    day: t,
                    assigned,
                    target: built.target_loads.get(t).copied().unwrap_or(0.0),
                    above: solution.value(built.vars.above[r][t]),
                    below: solution.value(built.vars.below[r][t]),
                };
                trace!(
                    "{} day {}: {} games, target {}, deviation {:+}",
                    dev.referee,
                    t,
                    dev.assigned,
                    dev.target,
                    dev.signed()
                );
                deviations.push(dev);

                if solution.value(built.vars.first_last[r][t]) > threshold {
                    first_last_flags += 1;
                }
            }
        }

        Self {
            unallowed_pairs: pre.unallowed_pairs.len(),
            variables: built.model.variable_count(),
            constraints: built.model.constraint_count(),
            constraints_by_family: built
                .model
                .constraint_count_by_family()
                .into_iter()
                .map(|(family, count)| (family.name().to_string(), count))
                .collect(),
            objective: solution.objective,
            deviations,
            first_last_flags,
        }
    }

    /// Sum of absolute deviations.
    pub fn total_deviation(&self) -> f64 {
        self.deviations.iter().map(LoadDeviation::magnitude).sum()
    }

    /// Largest absolute deviation of any referee-day.
    pub fn max_deviation(&self) -> f64 {
        self.deviations
            .iter()
            .map(LoadDeviation::magnitude)
            .fold(0.0, f64::max)
    }

    /// Deviations of one referee.
    pub fn deviations_for(&self, referee_id: &str) -> Vec<&LoadDeviation> {
        self.deviations
            .iter()
            .filter(|d| d.referee == referee_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ModelVariables;
    use crate::milp::{MilpModel, VarId};
    use crate::models::{Day, Game, Referee};
    use chrono::{NaiveDate, NaiveTime};

    fn fixture() -> (Tournament, Precomputed, RefereeModel) {
        let date = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
        let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        let tour = Tournament::new(
            vec![
                Game::new("8-0", date, at(9), "Plan 1"),
                Game::new("8-1", date, at(12), "Plan 1"),
            ],
            vec![
                Referee::new("Anna", 2).available_on_all(1),
                Referee::new("Bo", 2).available_on_all(1),
            ],
        );
        let pre = Precomputed {
            days: vec![Day {
                index: 0,
                date,
                games: vec!["8-0".into(), "8-1".into()],
                fields: vec![],
            }],
            ..Precomputed::default()
        };
        // officiates 0..4, above 4..6, below 6..8, first_last 8..10
        let built = RefereeModel {
            model: MilpModel::new("test"),
            vars: ModelVariables {
                officiates: vec![vec![VarId(0), VarId(1)], vec![VarId(2), VarId(3)]],
                above: vec![vec![VarId(4)], vec![VarId(5)]],
                below: vec![vec![VarId(6)], vec![VarId(7)]],
                first_last: vec![vec![VarId(8)], vec![VarId(9)]],
            },
            target_loads: vec![2.0],
            big_m: vec![2.0],
        };
        (tour, pre, built)
    }

    #[test]
    fn test_deviations() {
        let (tour, pre, built) = fixture();
        // Anna on both games, Bo on one
        let solution = MilpSolution {
            values: vec![1.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0],
            objective: 11.0,
        };
        let diag = Diagnostics::calculate(&tour, &pre, &built, &solution, 0.5);

        assert_eq!(diag.deviations.len(), 2);
        let anna = diag.deviations_for("Anna");
        assert_eq!(anna[0].assigned, 2);
        assert!((anna[0].signed()).abs() < 1e-10);
        let bo = diag.deviations_for("Bo");
        assert_eq!(bo[0].assigned, 1);
        assert!((bo[0].signed() + 1.0).abs() < 1e-10);

        assert!((diag.total_deviation() - 1.0).abs() < 1e-10);
        assert!((diag.max_deviation() - 1.0).abs() < 1e-10);
        assert_eq!(diag.first_last_flags, 1);
        assert!((diag.objective - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_model_counts() {
        let (tour, pre, built) = fixture();
        let solution = MilpSolution {
            values: vec![0.0; 10],
            objective: 0.0,
        };
        let diag = Diagnostics::calculate(&tour, &pre, &built, &solution, 0.5);
        assert_eq!(diag.variables, 0);
        assert_eq!(diag.constraints, 0);
        assert!(diag.constraints_by_family.is_empty());
        assert_eq!(diag.unallowed_pairs, 0);
    }

    #[test]
    fn test_assigned_uses_decode_threshold() {
        let (tour, pre, built) = fixture();
        // Anna at 0.7 on both games, Bo at 0.3 on both
        let solution = MilpSolution {
            values: vec![0.7, 0.7, 0.3, 0.3, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            objective: 0.0,
        };

        let lenient = Diagnostics::calculate(&tour, &pre, &built, &solution, 0.2);
        assert_eq!(lenient.deviations_for("Bo")[0].assigned, 2);

        let strict = Diagnostics::calculate(&tour, &pre, &built, &solution, 0.8);
        assert_eq!(strict.deviations_for("Anna")[0].assigned, 0);

        let decoded = crate::builder::decode_assignment(&tour, &built.vars, &solution, 0.8);
        assert_eq!(decoded.games_for_referee("Anna").len(), 0);
    }
}
