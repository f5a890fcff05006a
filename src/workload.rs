//! Target load calculation.
//!
//! The fairness baseline: how many games each available referee should
//! officiate on a day if the day's officiating slots were spread evenly.
//!
//! ```text
//! target(t) = round(2 · games(t) / available(t))
//! ```
//!
//! The factor 2 counts every game as two slots (most games need two
//! referees). Rounding is to the nearest integer, halves away from zero.

use crate::error::{PlanError, Result};
use crate::models::Referee;

/// Number of referees available on day `t`.
pub fn available_count(referees: &[Referee], t: usize) -> usize {
    referees.iter().filter(|r| r.is_available(t)).count()
}

/// Target games per referee on day `t`.
///
/// # Errors
/// [`PlanError::NoAvailableReferees`] when nobody is available on day `t`.
pub fn target_load(games_on_day: usize, referees: &[Referee], t: usize) -> Result<f64> {
    let available = available_count(referees, t);
    if available == 0 {
        return Err(PlanError::NoAvailableReferees { day: t });
    }
    Ok((2.0 * games_on_day as f64 / available as f64).round())
}

/// Target load for every day, given the game count per day.
pub fn target_loads(games_per_day: &[usize], referees: &[Referee]) -> Result<Vec<f64>> {
    games_per_day
        .iter()
        .enumerate()
        .map(|(t, &games)| target_load(games, referees, t))
        .collect()
}
