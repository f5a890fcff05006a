//! Planner errors.
//!
//! Every failure aborts the run; there is no partial schedule. Colleague
//! integrity problems surface as [`PlanError::Configuration`] before any
//! model is built, and an infeasible model surfaces as
//! [`PlanError::NoSolution`] with the precomputed conflict data attached so
//! it can still be inspected.

use thiserror::Error;

use crate::models::Violation;
use crate::precompute::Precomputed;
use crate::validation::ValidationError;

/// Crate result alias.
pub type Result<T> = std::result::Result<T, PlanError>;

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Planner error.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Colleague pairs are inconsistent (a referee in two pairs, a self
    /// pair, or an unknown referee).
    #[error("colleague configuration is inconsistent: {}", join_messages(.0))]
    Configuration(Vec<ValidationError>),

    /// Input data breaks a structural contract.
    #[error("invalid input: {}", join_messages(.0))]
    InvalidInput(Vec<ValidationError>),

    /// Planner settings are unusable.
    #[error("invalid planner configuration: {0}")]
    InvalidConfig(String),

    /// No referee is available on a day that has games.
    #[error("no referees available on day {day}")]
    NoAvailableReferees { day: usize },

    /// A game's group matches no entry in the group → level table.
    #[error("game '{game}' has group '{group}' with no level in the group table")]
    UnknownGroup { game: String, group: String },

    /// The engine proved the model infeasible.
    #[error("no solution found ({} unallowed pairs precomputed)", .precomputed.unallowed_pairs.len())]
    NoSolution { precomputed: Box<Precomputed> },

    /// The engine failed for another reason.
    #[error("solver failed: {0}")]
    Solver(String),

    /// The decoded assignment breaks the rules the model encodes.
    #[error("decoded assignment breaks {} rule(s)", .0.len())]
    InvalidSolution(Vec<Violation>),
}

impl PlanError {
    /// Whether this is the colleague-integrity configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, PlanError::Configuration(_))
    }

    /// Whether the engine found no solution.
    pub fn is_no_solution(&self) -> bool {
        matches!(self, PlanError::NoSolution { .. })
    }
}
