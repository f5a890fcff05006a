//! End-to-end planning pipeline.
//!
//! # Algorithm
//!
//! 1. Check the configuration.
//! 2. Validate the tournament (colleague integrity first).
//! 3. Precompute conflicts, day groupings and finals.
//! 4. Build the model (target loads are derived here).
//! 5. Solve once.
//! 6. Decode at the configured threshold.
//! 7. Re-verify the decoded assignment.
//! 8. Merge into output rows grouped by date, and compute diagnostics.
//!
//! Any failure aborts the run. There is no partial schedule.

use chrono::{NaiveDate, NaiveTime};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::builder::RefereeModelBuilder;
use crate::config::PlannerConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{PlanError, Result};
use crate::ingest::{prepare, TournamentInput};
use crate::milp::MilpSolver;
use crate::models::{AssignmentMap, Tournament};
use crate::precompute::{precompute, Precomputed};
use crate::validation::{validate_tournament, verify_assignment};

/// One output row: a game with its referees filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledGame {
    pub game_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub field: String,
    pub group: String,
    pub round: String,
    /// Primary referee.
    pub referee_1: Option<String>,
    /// Secondary referee (pool games have none).
    pub referee_2: Option<String>,
}

/// Output rows keyed by date, each date's rows in game order.
pub type DailySchedule = BTreeMap<NaiveDate, Vec<ScheduledGame>>;

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// Game id → referees.
    pub assignment: AssignmentMap,
    /// Output rows grouped by date.
    pub schedule: DailySchedule,
    /// Conflicts and groupings used for the model.
    pub precomputed: Precomputed,
    /// Model size, objective and load deviations.
    pub diagnostics: Diagnostics,
}

/// Merges an assignment into per-date output rows.
pub fn merge_output(tournament: &Tournament, assignment: &AssignmentMap) -> DailySchedule {
    let mut schedule = DailySchedule::new();
    for game in &tournament.games {
        let referees = assignment.get(&game.id);
        schedule.entry(game.date).or_default().push(ScheduledGame {
            game_id: game.id.clone(),
            date: game.date,
            time: game.start,
            field: game.field.clone(),
            group: game.group.clone(),
            round: game.round.clone(),
            referee_1: referees.and_then(|a| a.primary()).map(String::from),
            referee_2: referees.and_then(|a| a.secondary()).map(String::from),
        });
    }
    schedule
}

/// Referee planner over a MILP engine.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use referee_schedule::milp::GoodLpSolver;
/// use referee_schedule::models::{Game, Referee, Tournament};
/// use referee_schedule::planner::RefereePlanner;
///
/// let date = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
/// let tournament = Tournament::new(
///     vec![Game::new("8-0", date, NaiveTime::from_hms_opt(9, 0, 0).unwrap(), "Plan 1")
///         .with_required_referees(1)],
///     vec![Referee::new("Anna", 1).available_on_all(1)],
/// );
///
/// let outcome = RefereePlanner::new(GoodLpSolver::new()).plan(&tournament).unwrap();
/// assert_eq!(outcome.assignment.referees_for("8-0"), &["Anna"]);
/// ```
pub struct RefereePlanner<S: MilpSolver> {
    solver: S,
    config: PlannerConfig,
}

impl<S: MilpSolver> RefereePlanner<S> {
    /// Creates a planner with the default configuration.
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            config: PlannerConfig::default(),
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Prepares typed records and plans them.
    pub fn plan_input(&self, input: &TournamentInput) -> Result<PlanOutcome> {
        let tournament = prepare(input, &self.config)?;
        self.plan(&tournament)
    }

    /// Plans a tournament.
    ///
    /// # Errors
    /// - [`PlanError::InvalidConfig`] for unusable settings
    /// - [`PlanError::Configuration`] for colleague-pair problems
    /// - [`PlanError::InvalidInput`] for structural input problems
    /// - [`PlanError::NoAvailableReferees`] for a day with nobody available
    /// - [`PlanError::NoSolution`] when the rules cannot all be met
    /// - [`PlanError::Solver`] for other engine failures
    /// - [`PlanError::InvalidSolution`] when the engine's answer breaks a rule
    pub fn plan(&self, tournament: &Tournament) -> Result<PlanOutcome> {
        self.config.check()?;
        info!(
            "Planning {} games over {} days with {} referees",
            tournament.games.len(),
            tournament.day_count(),
            tournament.referees.len()
        );
        validate_tournament(tournament)?;

        let pre = precompute(tournament, &self.config);
        let builder = RefereeModelBuilder::new(tournament, &pre).with_config(self.config.clone());
        let (assignment, built, solution) = builder.solve(&self.solver)?;

        let violations = verify_assignment(tournament, &pre, &assignment, &self.config);
        if !violations.is_empty() {
            return Err(PlanError::InvalidSolution(violations));
        }

        let diagnostics = Diagnostics::calculate(
            tournament,
            &pre,
            &built,
            &solution,
            self.config.decode_threshold,
        );
        info!(
            "Assigned {} referee slots, total deviation {}",
            assignment.assignment_count(),
            diagnostics.total_deviation()
        );

        Ok(PlanOutcome {
            schedule: merge_output(tournament, &assignment),
            assignment,
            precomputed: pre,
            diagnostics,
        })
    }
}
