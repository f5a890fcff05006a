//! Referee assignment for multi-day, multi-field tournaments.
//!
//! Turns games, referees, availability and qualification levels into a
//! mixed-integer linear model, solves it once, and decodes the solution
//! into a per-game referee assignment.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Game`, `Referee`, `ColleaguePair`,
//!   `UnallowedPair`, `Day`, `AssignmentMap`, `Tournament`
//! - **`ingest`**: Typed records → `Tournament` (ids, referee counts, levels, finals)
//! - **`precompute`**: Conflicting game pairs, per-day and per-field orderings
//! - **`workload`**: Per-day target load
//! - **`validation`**: Input integrity checks and post-solve verification
//! - **`milp`**: Engine-neutral model, `MilpSolver` trait, good_lp adapter
//! - **`builder`**: The referee model formulation and decoding
//! - **`planner`**: The end-to-end pipeline and output rows
//! - **`diagnostics`**: Model size, objective, load deviations
//!
//! # Example
//!
//! ```
//! use chrono::{NaiveDate, NaiveTime};
//! use referee_schedule::{GoodLpSolver, RefereePlanner};
//! use referee_schedule::models::{Game, Referee, Tournament};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
//! let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
//! let tournament = Tournament::new(
//!     vec![
//!         Game::new("8-0", date, at(9), "Plan 1").with_required_referees(1),
//!         Game::new("8-1", date, at(9), "Plan 2").with_required_referees(1),
//!     ],
//!     vec![
//!         Referee::new("Anna", 2).available_on_all(1),
//!         Referee::new("Bo", 2).available_on_all(1),
//!     ],
//! );
//!
//! let outcome = RefereePlanner::new(GoodLpSolver::new()).plan(&tournament).unwrap();
//! let first = &outcome.assignment.referees_for("8-0")[0];
//! let second = &outcome.assignment.referees_for("8-1")[0];
//! assert_ne!(first, second);
//! ```
//!
//! # References
//!
//! - Wolsey (2020), "Integer Programming", Ch. 1: Formulations
//! - Duarte et al. (2007), "Referee assignment in sports leagues"

pub mod builder;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod ingest;
pub mod milp;
pub mod models;
pub mod planner;
pub mod precompute;
pub mod validation;
pub mod workload;

pub use config::PlannerConfig;
pub use error::{PlanError, Result};
pub use milp::{GoodLpSolver, MilpSolver};
pub use planner::{merge_output, DailySchedule, PlanOutcome, RefereePlanner, ScheduledGame};
