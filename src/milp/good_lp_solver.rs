//! `good_lp` backend.
//!
//! Translates a [`MilpModel`] into `good_lp` variables and constraints and
//! solves it with the crate's default solver (the pure-Rust `microlp`
//! engine with this crate's feature set).

use good_lp::{
    default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use log::{debug, warn};
use std::time::Instant;

use super::{
    Comparison, LinearExpr, MilpModel, MilpSolution, MilpSolver, SolverConfig, SolverError,
    VarKind,
};

/// Solver backed by `good_lp`'s default engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl GoodLpSolver {
    /// Creates the solver.
    pub fn new() -> Self {
        Self
    }
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Result<Expression, SolverError> {
    let mut out = Expression::with_capacity(expr.terms.len());
    for (var, coef) in &expr.terms {
        let handle = handles.get(var.0).ok_or_else(|| {
            SolverError::Backend(format!("expression references undeclared variable {}", var.0))
        })?;
        out.add_mul(*coef, *handle);
    }
    Ok(out)
}

impl MilpSolver for GoodLpSolver {
    fn name(&self) -> &'static str {
        "good_lp/microlp"
    }

    fn solve(&self, model: &MilpModel, config: &SolverConfig) -> Result<MilpSolution, SolverError> {
        // microlp exposes no tuning knobs
        if config.mip_gap.is_some() || config.time_limit_secs.is_some() || config.threads.is_some()
        {
            warn!("{} ignores mip_gap, time_limit_secs and threads", self.name());
        }

        let start = Instant::now();
        let mut vars = ProblemVariables::new();
        let handles: Vec<Variable> = model
            .variables
            .iter()
            .map(|v| match v.kind {
                VarKind::Binary => vars.add(variable().binary().name(v.name.clone())),
                VarKind::Continuous { lower } => {
                    vars.add(variable().min(lower).name(v.name.clone()))
                }
            })
            .collect();

        let objective = to_expression(&model.objective, &handles)?;
        let mut problem = vars.minimise(objective).using(default_solver);

        for c in &model.constraints {
            let lhs = to_expression(&c.expr, &handles)?;
            // constants move to the right-hand side
            let rhs = c.rhs - c.expr.constant;
            let constraint = match c.cmp {
                Comparison::LessEq => lhs.leq(rhs),
                Comparison::GreaterEq => lhs.geq(rhs),
                Comparison::Equal => lhs.eq(rhs),
            };
            problem.add_constraint(constraint);
        }

        debug!(
            "Submitting '{}' to {}: {} variables, {} constraints",
            model.name,
            self.name(),
            model.variable_count(),
            model.constraint_count()
        );

        let solution = match problem.solve() {
            Ok(s) => s,
            Err(ResolutionError::Infeasible) => return Err(SolverError::Infeasible),
            Err(ResolutionError::Unbounded) => return Err(SolverError::Unbounded),
            Err(e) => return Err(SolverError::Backend(e.to_string())),
        };

        let values: Vec<f64> = handles.iter().map(|h| solution.value(*h)).collect();
        let objective = model.objective.evaluate(&values);
        debug!("{} finished in {:.2?}", self.name(), start.elapsed());

        Ok(MilpSolution { values, objective })
    }
}
