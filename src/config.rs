//! Planner configuration.
//!
//! Every constant the model uses is a field here, with the tournament's
//! house rules as defaults. Configuration can be built in code with the
//! `with_*` setters or loaded from JSON; missing JSON keys take defaults.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::milp::SolverConfig;

/// Planner configuration.
///
/// # Defaults
///
/// | Field | Default | Rule |
/// |-------|---------|------|
/// | `conflict_window_minutes` | 72 | games on different fields ≤ 1.2 h apart conflict |
/// | `window_size` / `max_in_window` | 5 / 4 | at most 4 of any 5 consecutive games |
/// | `overqualification_cap` | 3 | level − required ≤ 3 |
/// | `first_last_weight` | 10.0 | objective weight of the first/last indicator |
/// | `decode_threshold` | 0.5 | binary rounding boundary |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Two games on different fields conflict if their kick-offs are at most
    /// this many minutes apart (inclusive).
    pub conflict_window_minutes: i64,
    /// Length of the sliding window for the consecutive-game cap.
    pub window_size: usize,
    /// Maximum games per referee within one window.
    pub max_in_window: u32,
    /// Maximum `level − required_level` for an assigned referee.
    pub overqualification_cap: u32,
    /// Objective weight of the first-and-last indicator.
    pub first_last_weight: f64,
    /// Values above this decode as "assigned".
    pub decode_threshold: f64,
    /// Big-M for the availability gate. `None` derives it per day as the
    /// number of games that day.
    pub availability_big_m: Option<f64>,
    /// Whether opening and closing the same field counts for the
    /// first-and-last indicator.
    pub penalize_same_field: bool,
    /// Round label identifying finals.
    pub final_round_label: String,
    /// Substring of the group label identifying single-referee pool games.
    pub pool_marker: String,
    /// Engine settings.
    pub solver: SolverConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            conflict_window_minutes: 72,
            window_size: 5,
            max_in_window: 4,
            overqualification_cap: 3,
            first_last_weight: 10.0,
            decode_threshold: 0.5,
            availability_big_m: None,
            penalize_same_field: true,
            final_round_label: "Final".to_string(),
            pool_marker: "Pool".to_string(),
            solver: SolverConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from JSON. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, PlanError> {
        serde_json::from_str(json).map_err(|e| PlanError::InvalidConfig(e.to_string()))
    }

    /// Sets the conflict window (minutes).
    pub fn with_conflict_window_minutes(mut self, minutes: i64) -> Self {
        self.conflict_window_minutes = minutes;
        self
    }

    /// Sets the consecutive-game window and its cap.
    pub fn with_consecutive_cap(mut self, window_size: usize, max_in_window: u32) -> Self {
        self.window_size = window_size;
        self.max_in_window = max_in_window;
        self
    }

    /// Sets the overqualification cap.
    pub fn with_overqualification_cap(mut self, cap: u32) -> Self {
        self.overqualification_cap = cap;
        self
    }

    /// Sets the first-and-last objective weight.
    pub fn with_first_last_weight(mut self, weight: f64) -> Self {
        self.first_last_weight = weight;
        self
    }

    /// Fixes the availability big-M instead of deriving it.
    pub fn with_availability_big_m(mut self, big_m: f64) -> Self {
        self.availability_big_m = Some(big_m);
        self
    }

    /// Enables or disables same-field first/last pairing.
    pub fn with_same_field_penalty(mut self, enabled: bool) -> Self {
        self.penalize_same_field = enabled;
        self
    }

    /// Sets the engine configuration.
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Conflict window in seconds.
    pub fn conflict_window_seconds(&self) -> i64 {
        self.conflict_window_minutes * 60
    }

    /// Checks the configuration for values the model cannot use.
    pub fn check(&self) -> Result<(), PlanError> {
        if self.window_size == 0 {
            return Err(PlanError::InvalidConfig("window_size must be at least 1".into()));
        }
        if self.conflict_window_minutes < 0 {
            return Err(PlanError::InvalidConfig(
                "conflict_window_minutes must not be negative".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.decode_threshold) {
            return Err(PlanError::InvalidConfig(
                "decode_threshold must lie in [0, 1)".into(),
            ));
        }
        if let Some(m) = self.availability_big_m {
            if m <= 0.0 {
                return Err(PlanError::InvalidConfig(
                    "availability_big_m must be positive".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = PlannerConfig::default();
        assert_eq!(c.conflict_window_seconds(), 72 * 60);
        assert_eq!(c.window_size, 5);
        assert_eq!(c.max_in_window, 4);
        assert_eq!(c.overqualification_cap, 3);
        assert!((c.first_last_weight - 10.0).abs() < 1e-10);
        assert!(c.availability_big_m.is_none());
        assert!(c.penalize_same_field);
        assert!(c.check().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let c = PlannerConfig::from_json_str(
            r#"{ "conflict_window_minutes": 60, "penalize_same_field": false }"#,
        )
        .unwrap();
        assert_eq!(c.conflict_window_minutes, 60);
        assert!(!c.penalize_same_field);
        assert_eq!(c.window_size, 5);
        assert_eq!(c.final_round_label, "Final");
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = PlannerConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfig(_)));
    }

    #[test]
    fn test_check_rejects_bad_values() {
        assert!(PlannerConfig::new().with_consecutive_cap(0, 0).check().is_err());
        assert!(PlannerConfig::new().with_availability_big_m(0.0).check().is_err());
        assert!(PlannerConfig::new()
            .with_conflict_window_minutes(-1)
            .check()
            .is_err());
    }

    #[test]
    fn test_builder_setters() {
        let c = PlannerConfig::new()
            .with_conflict_window_minutes(90)
            .with_consecutive_cap(4, 3)
            .with_overqualification_cap(2)
            .with_first_last_weight(5.0)
            .with_availability_big_m(12.0)
            .with_same_field_penalty(false);
        assert_eq!(c.conflict_window_minutes, 90);
        assert_eq!((c.window_size, c.max_in_window), (4, 3));
        assert_eq!(c.overqualification_cap, 2);
        assert_eq!(c.availability_big_m, Some(12.0));
        assert!(!c.penalize_same_field);
    }
}
