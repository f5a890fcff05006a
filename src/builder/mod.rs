//! Referee assignment MILP formulation.
//!
//! Turns a validated tournament and its precomputed conflicts/groupings into
//! a [`MilpModel`], and decodes an engine solution back into an
//! [`AssignmentMap`].
//!
//! # Variables
//!
//! | Variable | Domain | Meaning |
//! |----------|--------|---------|
//! | `officiates[r,g]` | binary | referee `r` officiates game `g` |
//! | `above[r,t]`, `below[r,t]` | ≥ 0 | signed deviation from the day's target load |
//! | `first_last[r,t]` | binary | `r` has both an opening and a closing slot on day `t` |
//!
//! # Objective
//!
//! ```text
//! minimise  Σ (above[r,t] + below[r,t])  +  W · Σ first_last[r,t]
//! ```
//!
//! `W` (default 10) is large against single deviation units, so the
//! solver does not buy comfort with fairness.
//!
//! # Constraints
//!
//! Coverage, qualification floor/ceiling, conflict exclusion, consecutive
//! cap, colleague lock-step, availability gate, single final, first/last
//! linkage, consecutive attendance, deviation linkage. Each is tagged with
//! its [`ConstraintFamily`].

mod decode;

pub use decode::decode_assignment;

use log::{debug, info};
use std::collections::HashMap;

use crate::config::PlannerConfig;
use crate::error::{PlanError, Result};
use crate::milp::{
    Comparison, ConstraintFamily, LinearExpr, MilpModel, MilpSolution, MilpSolver, VarId,
};
use crate::models::{AssignmentMap, Day, Tournament};
use crate::precompute::Precomputed;
use crate::validation::{ValidationError, ValidationErrorKind};
use crate::workload::target_loads;

/// Variable handles of a built model.
///
/// Indexed by roster position `r`, game position `g` (in
/// `Tournament::games`), and day index `t`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelVariables {
    /// `officiates[r][g]`.
    pub officiates: Vec<Vec<VarId>>,
    /// `above[r][t]`.
    pub above: Vec<Vec<VarId>>,
    /// `below[r][t]`.
    pub below: Vec<Vec<VarId>>,
    /// `first_last[r][t]`.
    pub first_last: Vec<Vec<VarId>>,
}

/// A built model together with the data needed to decode it.
#[derive(Debug, Clone)]
pub struct RefereeModel {
    /// The formulation.
    pub model: MilpModel,
    /// Variable handles.
    pub vars: ModelVariables,
    /// Target load per day.
    pub target_loads: Vec<f64>,
    /// Availability big-M per day.
    pub big_m: Vec<f64>,
}

/// Builds the referee assignment model.
///
/// # Example
/// ```no_run
/// use referee_schedule::builder::RefereeModelBuilder;
/// use referee_schedule::milp::GoodLpSolver;
/// use referee_schedule::models::Tournament;
/// use referee_schedule::precompute::precompute;
/// use referee_schedule::PlannerConfig;
///
/// let tournament = Tournament::default();
/// let config = PlannerConfig::default();
/// let pre = precompute(&tournament, &config);
/// let builder = RefereeModelBuilder::new(&tournament, &pre).with_config(config);
/// let (assignment, _model, _solution) = builder.solve(&GoodLpSolver::new()).unwrap();
/// ```
pub struct RefereeModelBuilder<'a> {
    tournament: &'a Tournament,
    pre: &'a Precomputed,
    config: PlannerConfig,
    game_index: HashMap<&'a str, usize>,
    referee_index: HashMap<&'a str, usize>,
}

impl<'a> RefereeModelBuilder<'a> {
    /// Creates a builder with the default configuration.
    pub fn new(tournament: &'a Tournament, pre: &'a Precomputed) -> Self {
        Self {
            tournament,
            pre,
            config: PlannerConfig::default(),
            game_index: tournament
                .games
                .iter()
                .enumerate()
                .map(|(i, g)| (g.id.as_str(), i))
                .collect(),
            referee_index: tournament
                .referees
                .iter()
                .enumerate()
                .map(|(i, r)| (r.id.as_str(), i))
                .collect(),
        }
    }

    /// Sets the planner configuration.
    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the model.
    ///
    /// # Errors
    /// - [`PlanError::NoAvailableReferees`] if a day has nobody available
    /// - [`PlanError::InvalidInput`] if the precomputed data names a game or
    ///   referee missing from the tournament
    pub fn build(&self) -> Result<RefereeModel> {
        let games_per_day: Vec<usize> = self.pre.days.iter().map(Day::game_count).collect();
        let targets = target_loads(&games_per_day, &self.tournament.referees)?;
        let big_m: Vec<f64> = games_per_day
            .iter()
            .map(|&n| self.config.availability_big_m.unwrap_or(n as f64))
            .collect();

        let mut model = MilpModel::new("referee_assignment");
        let vars = self.declare_variables(&mut model);

        let mut objective = LinearExpr::new();
        for r in 0..self.tournament.referees.len() {
            for t in 0..self.pre.days.len() {
                objective.add_term(vars.above[r][t], 1.0);
                objective.add_term(vars.below[r][t], 1.0);
                objective.add_term(vars.first_last[r][t], self.config.first_last_weight);
            }
        }
        model.minimize(objective);

        self.add_coverage(&mut model, &vars);
        self.add_qualification(&mut model, &vars);
        self.add_conflict_exclusion(&mut model, &vars)?;
        self.add_consecutive_cap(&mut model, &vars)?;
        self.add_colleague_lock_step(&mut model, &vars)?;
        self.add_daily_load(&mut model, &vars, &targets, &big_m)?;
        self.add_single_final(&mut model, &vars)?;
        self.add_first_last_linkage(&mut model, &vars)?;
        self.add_consecutive_attendance(&mut model, &vars)?;

        info!(
            "Built model with {} variables and {} constraints",
            model.variable_count(),
            model.constraint_count()
        );
        for (family, count) in model.constraint_count_by_family() {
            debug!("  {:<24} {}", family.name(), count);
        }

        Ok(RefereeModel {
            model,
            vars,
            target_loads: targets,
            big_m,
        })
    }

    /// Builds, solves, and decodes.
    ///
    /// # Errors
    /// Build errors, [`PlanError::NoSolution`] when the engine reports
    /// infeasibility, [`PlanError::Solver`] for other engine failures.
    pub fn solve<S: MilpSolver>(
        &self,
        solver: &S,
    ) -> Result<(AssignmentMap, RefereeModel, MilpSolution)> {
        let built = self.build()?;
        info!("Solving with {}", solver.name());
        let solution = match solver.solve(&built.model, &self.config.solver) {
            Ok(s) => s,
            Err(crate::milp::SolverError::Infeasible) => {
                info!("No solution found");
                return Err(PlanError::NoSolution {
                    precomputed: Box::new(self.pre.clone()),
                });
            }
            Err(e) => return Err(PlanError::Solver(e.to_string())),
        };
        info!("Objective value: {}", solution.objective);

        let assignment = decode_assignment(
            self.tournament,
            &built.vars,
            &solution,
            self.config.decode_threshold,
        );
        Ok((assignment, built, solution))
    }

    fn declare_variables(&self, model: &mut MilpModel) -> ModelVariables {
        let mut vars = ModelVariables::default();
        for referee in &self.tournament.referees {
            vars.officiates.push(
                self.tournament
                    .games
                    .iter()
                    .map(|g| model.add_binary(format!("officiates[{},{}]", referee.id, g.id)))
                    .collect(),
            );
            let days = 0..self.pre.days.len();
            vars.above.push(
                days.clone()
                    .map(|t| model.add_continuous(format!("above[{},{t}]", referee.id), 0.0))
                    .collect(),
            );
            vars.below.push(
                days.clone()
                    .map(|t| model.add_continuous(format!("below[{},{t}]", referee.id), 0.0))
                    .collect(),
            );
            vars.first_last.push(
                days.map(|t| model.add_binary(format!("first_last[{},{t}]", referee.id)))
                    .collect(),
            );
        }
        vars
    }

    fn game(&self, id: &str) -> Result<usize> {
        self.game_index.get(id).copied().ok_or_else(|| {
            PlanError::InvalidInput(vec![ValidationError::new(
                ValidationErrorKind::UnknownGame,
                format!("Precomputed data names unknown game '{id}'"),
            )])
        })
    }

    fn referee(&self, id: &str) -> Result<usize> {
        self.referee_index.get(id).copied().ok_or_else(|| {
            PlanError::InvalidInput(vec![ValidationError::new(
                ValidationErrorKind::UnknownColleague,
                format!("Colleague pair names unknown referee '{id}'"),
            )])
        })
    }

    fn games(&self, ids: &[String]) -> Result<Vec<usize>> {
        ids.iter().map(|id| self.game(id)).collect()
    }

    fn referee_count(&self) -> usize {
        self.tournament.referees.len()
    }

    /// Σ_r officiates[r,g] = required(g).
    fn add_coverage(&self, model: &mut MilpModel, vars: &ModelVariables) {
        for (g, game) in self.tournament.games.iter().enumerate() {
            let expr = LinearExpr::sum((0..self.referee_count()).map(|r| vars.officiates[r][g]));
            model.add_constraint(
                ConstraintFamily::Coverage,
                expr,
                Comparison::Equal,
                game.required_referees as f64,
            );
        }
    }

    /// level(r) − required(g)·x ≥ 0 and x·(level(r) − required(g)) ≤ cap.
    fn add_qualification(&self, model: &mut MilpModel, vars: &ModelVariables) {
        let cap = self.config.overqualification_cap as f64;
        for (g, game) in self.tournament.games.iter().enumerate() {
            let required = game.required_level as f64;
            for (r, referee) in self.tournament.referees.iter().enumerate() {
                let x = vars.officiates[r][g];
                let level = referee.level as f64;
                model.add_constraint(
                    ConstraintFamily::QualificationFloor,
                    LinearExpr::new().term(x, -required).plus(level),
                    Comparison::GreaterEq,
                    0.0,
                );
                model.add_constraint(
                    ConstraintFamily::QualificationCeiling,
                    LinearExpr::new().term(x, level - required),
                    Comparison::LessEq,
                    cap,
                );
            }
        }
    }

    /// x[r,a] + x[r,b] ≤ 1 for every unallowed pair (a, b).
    fn add_conflict_exclusion(&self, model: &mut MilpModel, vars: &ModelVariables) -> Result<()> {
        for pair in &self.pre.unallowed_pairs {
            let (a, b) = (self.game(&pair.first)?, self.game(&pair.second)?);
            for r in 0..self.referee_count() {
                model.add_constraint(
                    ConstraintFamily::ConflictExclusion,
                    LinearExpr::sum([vars.officiates[r][a], vars.officiates[r][b]]),
                    Comparison::LessEq,
                    1.0,
                );
            }
        }
        Ok(())
    }

    /// At most `max_in_window` of any `window_size` chronologically
    /// consecutive games of a day.
    fn add_consecutive_cap(&self, model: &mut MilpModel, vars: &ModelVariables) -> Result<()> {
        let cap = self.config.max_in_window as f64;
        for day in &self.pre.days {
            for window in day.windows(self.config.window_size) {
                let games = self.games(window)?;
                for r in 0..self.referee_count() {
                    model.add_constraint(
                        ConstraintFamily::ConsecutiveCap,
                        LinearExpr::sum(games.iter().map(|&g| vars.officiates[r][g])),
                        Comparison::LessEq,
                        cap,
                    );
                }
            }
        }
        Ok(())
    }

    /// x[a,g] = x[b,g] for every colleague pair and every non-pool game.
    fn add_colleague_lock_step(&self, model: &mut MilpModel, vars: &ModelVariables) -> Result<()> {
        let pairs = self
            .tournament
            .colleagues
            .iter()
            .map(|p| -> Result<(usize, usize)> {
                Ok((self.referee(&p.first)?, self.referee(&p.second)?))
            })
            .collect::<Result<Vec<_>>>()?;

        for (g, game) in self.tournament.games.iter().enumerate() {
            if game.is_pool() {
                continue;
            }
            for &(a, b) in &pairs {
                model.add_constraint(
                    ConstraintFamily::ColleagueLockStep,
                    LinearExpr::new()
                        .term(vars.officiates[a][g], 1.0)
                        .term(vars.officiates[b][g], -1.0),
                    Comparison::Equal,
                    0.0,
                );
            }
        }
        Ok(())
    }

    /// Availability gate and deviation linkage, per referee and day.
    ///
    /// ```text
    /// Σ_{g∈t} x[r,g] ≤ M_t · available(r,t)
    /// Σ_{g∈t} x[r,g] − target(t) = above[r,t] − below[r,t]
    /// ```
    fn add_daily_load(
        &self,
        model: &mut MilpModel,
        vars: &ModelVariables,
        targets: &[f64],
        big_m: &[f64],
    ) -> Result<()> {
        for day in &self.pre.days {
            let t = day.index;
            let games = self.games(&day.games)?;
            for (r, referee) in self.tournament.referees.iter().enumerate() {
                let assigned = LinearExpr::sum(games.iter().map(|&g| vars.officiates[r][g]));
                let flag = if referee.is_available(t) { 1.0 } else { 0.0 };

                model.add_constraint(
                    ConstraintFamily::AvailabilityGate,
                    assigned.clone(),
                    Comparison::LessEq,
                    big_m[t] * flag,
                );
                model.add_constraint(
                    ConstraintFamily::DeviationLinkage,
                    assigned
                        .plus(-targets[t])
                        .term(vars.above[r][t], -1.0)
                        .term(vars.below[r][t], 1.0),
                    Comparison::Equal,
                    0.0,
                );
            }
        }
        Ok(())
    }

    /// Σ_{g final} x[r,g] ≤ 1.
    fn add_single_final(&self, model: &mut MilpModel, vars: &ModelVariables) -> Result<()> {
        if self.pre.finals.is_empty() {
            return Ok(());
        }
        let finals = self
            .pre
            .finals
            .iter()
            .map(|id| self.game(id))
            .collect::<Result<Vec<_>>>()?;
        for r in 0..self.referee_count() {
            model.add_constraint(
                ConstraintFamily::SingleFinal,
                LinearExpr::sum(finals.iter().map(|&g| vars.officiates[r][g])),
                Comparison::LessEq,
                1.0,
            );
        }
        Ok(())
    }

    /// x[r, first(f1)] + x[r, last(f2)] ≤ 1 + first_last[r,t] for every
    /// ordered field pair of a day.
    ///
    /// Skipped when both slots are the same game (a single-game field
    /// paired with itself), and for `f1 = f2` when same-field pairing is
    /// switched off.
    fn add_first_last_linkage(&self, model: &mut MilpModel, vars: &ModelVariables) -> Result<()> {
        for day in &self.pre.days {
            let t = day.index;
            for opening in &day.fields {
                for closing in &day.fields {
                    if opening.field == closing.field && !self.config.penalize_same_field {
                        continue;
                    }
                    let (Some(first), Some(last)) = (opening.first(), closing.last()) else {
                        continue;
                    };
                    if first == last {
                        continue;
                    }
                    let (first, last) = (self.game(first)?, self.game(last)?);
                    for r in 0..self.referee_count() {
                        model.add_constraint(
                            ConstraintFamily::FirstLastLinkage,
                            LinearExpr::sum([vars.officiates[r][first], vars.officiates[r][last]])
                                .term(vars.first_last[r][t], -1.0),
                            Comparison::LessEq,
                            1.0,
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// On each field's non-final sequence, an assigned referee also covers
    /// a neighbouring game.
    ///
    /// ```text
    /// x[s0] ≤ x[s1]
    /// x[s_last] ≤ x[s_last-1]
    /// x[s_i-1] + x[s_i] + x[s_i+1] ≥ 2·x[s_i]     (interior i)
    /// ```
    ///
    /// Sequences shorter than two games are exempt.
    fn add_consecutive_attendance(
        &self,
        model: &mut MilpModel,
        vars: &ModelVariables,
    ) -> Result<()> {
        for day in &self.pre.days {
            for field in &day.fields {
                let seq = self.games(&field.non_final)?;
                let n = seq.len();
                if n < 2 {
                    continue;
                }
                for r in 0..self.referee_count() {
                    let x = |i: usize| vars.officiates[r][seq[i]];
                    model.add_constraint(
                        ConstraintFamily::ConsecutiveAttendance,
                        LinearExpr::new().term(x(0), 1.0).term(x(1), -1.0),
                        Comparison::LessEq,
                        0.0,
                    );
                    model.add_constraint(
                        ConstraintFamily::ConsecutiveAttendance,
                        LinearExpr::new().term(x(n - 1), 1.0).term(x(n - 2), -1.0),
                        Comparison::LessEq,
                        0.0,
                    );
                    for i in 1..n - 1 {
                        model.add_constraint(
                            ConstraintFamily::ConsecutiveAttendance,
                            LinearExpr::sum([x(i - 1), x(i), x(i + 1)]).term(x(i), -2.0),
                            Comparison::GreaterEq,
                            0.0,
                        );
                    }
                }
            }
        }
        Ok(())
    }
}
