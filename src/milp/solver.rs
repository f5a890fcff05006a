//! Engine capability interface.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::MilpModel;

/// Engine settings.
///
/// The core may set these but never implements them; each backend applies
/// what it supports and logs what it ignores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Acceptable relative optimality gap.
    pub mip_gap: Option<f64>,
    /// Wall-clock limit in seconds.
    pub time_limit_secs: Option<u64>,
    /// Engine thread count.
    pub threads: Option<u32>,
}

impl SolverConfig {
    /// Sets the optimality gap.
    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    /// Sets the time limit.
    pub fn with_time_limit_secs(mut self, secs: u64) -> Self {
        self.time_limit_secs = Some(secs);
        self
    }

    /// Sets the thread count.
    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = Some(threads);
        self
    }
}

/// Values read back from a successful solve.
#[derive(Debug, Clone, PartialEq)]
pub struct MilpSolution {
    /// Variable values indexed by `VarId`.
    pub values: Vec<f64>,
    /// Objective value at `values`.
    pub objective: f64,
}

impl MilpSolution {
    /// Value of one variable (0 for unknown ids).
    pub fn value(&self, var: super::VarId) -> f64 {
        self.values.get(var.0).copied().unwrap_or(0.0)
    }
}

/// Why a solve produced no solution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// The constraints admit no solution.
    #[error("model is infeasible")]
    Infeasible,
    /// The objective is unbounded below.
    #[error("model is unbounded")]
    Unbounded,
    /// Any other engine failure.
    #[error("engine failure: {0}")]
    Backend(String),
}

/// A MILP engine.
///
/// Implementations translate a [`MilpModel`] into their engine, solve it as
/// one blocking call, and return values indexed by `VarId`.
pub trait MilpSolver {
    /// Engine name for logs.
    fn name(&self) -> &'static str;

    /// Solves `model` (minimisation).
    fn solve(&self, model: &MilpModel, config: &SolverConfig) -> Result<MilpSolution, SolverError>;
}
