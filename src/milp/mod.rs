//! Mixed-integer linear programming layer.
//!
//! A small, engine-neutral formulation (`MilpModel`) plus the capability the
//! planner needs from an engine (`MilpSolver`): declare binary and
//! non-negative continuous variables, add linear constraints, minimise a
//! linear objective, and solve once. Any MILP engine can sit behind the
//! trait; `GoodLpSolver` is the bundled one.

mod good_lp_solver;
mod model;
mod solver;

pub use good_lp_solver::GoodLpSolver;
pub use model::{
    Comparison, ConstraintFamily, LinearConstraint, LinearExpr, MilpModel, VarId, VarKind,
    Variable,
};
pub use solver::{MilpSolution, MilpSolver, SolverConfig, SolverError};
