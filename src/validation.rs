//! Input validation and assignment verification.
//!
//! Two gates around the solve:
//!
//! - **Before** model construction, [`validate_tournament`] checks data
//!   integrity. Colleague-pair problems are reported separately as the
//!   configuration error; a referee bound to two colleagues has no
//!   well-defined feasible region, so no model is built.
//! - **After** decoding, [`verify_assignment`] re-checks every rule the
//!   model encodes against the decoded output.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::models::{AssignmentMap, ColleaguePair, Referee, Tournament, Violation, ViolationType};
use crate::precompute::Precomputed;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A referee appears in more than one colleague pair.
    ColleagueConflict,
    /// A colleague pair names the same referee twice.
    SelfColleague,
    /// A colleague pair names a referee missing from the roster.
    UnknownColleague,
    /// Two entities share the same ID.
    DuplicateId,
    /// A referee's availability does not cover every tournament day.
    AvailabilityLength,
    /// A game needs a referee count other than 1 or 2.
    InvalidRefereeCount,
    /// A game's date is not one of the tournament days.
    UnknownDay,
    /// The same date is listed twice as a tournament day.
    DuplicateDay,
    /// Derived data names a game the tournament does not have.
    UnknownGame,
    /// Input could not be parsed.
    Malformed,
    /// A game's group matches no entry in the group → level table.
    UnknownGroup,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Checks colleague-pair integrity.
///
/// Pairs are deduplicated first, so `(A, B)` and `(B, A)` count once.
/// Detects:
/// - a referee in more than one distinct pair
/// - a referee paired with itself
/// - a pair naming an unknown referee
pub fn validate_colleagues(referees: &[Referee], pairs: &[ColleaguePair]) -> ValidationResult {
    let mut errors = Vec::new();
    let known: HashSet<&str> = referees.iter().map(|r| r.id.as_str()).collect();
    let distinct: BTreeSet<&ColleaguePair> = pairs.iter().collect();

    let mut membership: HashMap<&str, Vec<&ColleaguePair>> = HashMap::new();
    for &pair in &distinct {
        if pair.is_self_pair() {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfColleague,
                format!("Referee '{}' is paired with itself", pair.first),
            ));
            continue;
        }
        for member in pair.members() {
            if !known.contains(member) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownColleague,
                    format!(
                        "Colleague pair ({}, {}) names unknown referee '{}'",
                        pair.first, pair.second, member
                    ),
                ));
            }
            membership.entry(member).or_default().push(pair);
        }
    }

    let mut shared: Vec<(&str, Vec<&ColleaguePair>)> = membership
        .into_iter()
        .filter(|(_, pairs)| pairs.len() > 1)
        .collect();
    shared.sort_by_key(|(id, _)| *id);
    for (referee, pairs) in shared {
        let partners: Vec<&str> = pairs
            .iter()
            .map(|p| if p.first == referee { p.second.as_str() } else { p.first.as_str() })
            .collect();
        errors.push(ValidationError::new(
            ValidationErrorKind::ColleagueConflict,
            format!(
                "Referee '{}' appears in {} colleague pairs (with {})",
                referee,
                pairs.len(),
                partners.join(", ")
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks structural integrity of the planning input.
///
/// Checks:
/// 1. No duplicate game, referee, or day entries
/// 2. Every game date is a tournament day
/// 3. Every game needs 1 or 2 referees
/// 4. Every referee's availability covers every day (extra entries are
///    ignored)
pub fn validate_input(tournament: &Tournament) -> ValidationResult {
    let mut errors = Vec::new();

    let mut days = HashSet::new();
    for d in &tournament.days {
        if !days.insert(*d) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateDay,
                format!("Day {d} is listed twice"),
            ));
        }
    }

    let mut game_ids = HashSet::new();
    for g in &tournament.games {
        if !game_ids.insert(g.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate game ID: {}", g.id),
            ));
        }
        if !days.contains(&g.date) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownDay,
                format!("Game '{}' is on {} which is not a tournament day", g.id, g.date),
            ));
        }
        if !(1..=2).contains(&g.required_referees) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRefereeCount,
                format!(
                    "Game '{}' needs {} referees (expected 1 or 2)",
                    g.id, g.required_referees
                ),
            ));
        }
    }

    let mut referee_ids = HashSet::new();
    for r in &tournament.referees {
        if !referee_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate referee ID: {}", r.id),
            ));
        }
        if r.availability.len() < tournament.day_count() {
            errors.push(ValidationError::new(
                ValidationErrorKind::AvailabilityLength,
                format!(
                    "Referee '{}' has availability for {} days, tournament has {}",
                    r.id,
                    r.availability.len(),
                    tournament.day_count()
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Runs all pre-model checks, colleague integrity first.
///
/// # Errors
/// - [`PlanError::Configuration`] for colleague-pair problems
/// - [`PlanError::InvalidInput`] for structural problems
pub fn validate_tournament(tournament: &Tournament) -> Result<(), PlanError> {
    validate_colleagues(&tournament.referees, &tournament.colleagues)
        .map_err(PlanError::Configuration)?;
    validate_input(tournament).map_err(PlanError::InvalidInput)
}

/// Checks a decoded assignment against every rule the model encodes.
///
/// Returns all violations found; an empty vector means the assignment is
/// acceptable.
pub fn verify_assignment(
    tournament: &Tournament,
    pre: &Precomputed,
    assignment: &AssignmentMap,
    config: &PlannerConfig,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let referees: HashMap<&str, &Referee> = tournament
        .referees
        .iter()
        .map(|r| (r.id.as_str(), r))
        .collect();

    for id in assignment.games.keys() {
        if tournament.game(id).is_none() {
            violations.push(Violation::new(
                ViolationType::UnknownEntity,
                id.as_str(),
                format!("Assignment names unknown game '{id}'"),
            ));
        }
    }

    for game in &tournament.games {
        let assigned = assignment.referees_for(&game.id);

        if assigned.len() != game.required_referees as usize {
            violations.push(Violation::new(
                ViolationType::Coverage,
                game.id.as_str(),
                format!(
                    "Game '{}' has {} referees, needs {}",
                    game.id,
                    assigned.len(),
                    game.required_referees
                ),
            ));
        }

        for ref_id in assigned {
            let Some(referee) = referees.get(ref_id.as_str()) else {
                violations.push(Violation::new(
                    ViolationType::UnknownEntity,
                    ref_id.as_str(),
                    format!("Game '{}' names unknown referee '{ref_id}'", game.id),
                ));
                continue;
            };
            if referee.level < game.required_level {
                violations.push(Violation::new(
                    ViolationType::Underqualified,
                    ref_id.as_str(),
                    format!(
                        "'{ref_id}' (level {}) below level {} for game '{}'",
                        referee.level, game.required_level, game.id
                    ),
                ));
            } else if referee.level - game.required_level > config.overqualification_cap {
                violations.push(Violation::new(
                    ViolationType::Overqualified,
                    ref_id.as_str(),
                    format!(
                        "'{ref_id}' (level {}) too senior for game '{}' (level {})",
                        referee.level, game.id, game.required_level
                    ),
                ));
            }
        }

        if !game.is_pool() {
            for pair in &tournament.colleagues {
                let a = assigned.contains(&pair.first);
                let b = assigned.contains(&pair.second);
                if a != b {
                    violations.push(Violation::new(
                        ViolationType::ColleagueSplit,
                        game.id.as_str(),
                        format!(
                            "Colleagues '{}' and '{}' split on game '{}'",
                            pair.first, pair.second, game.id
                        ),
                    ));
                }
            }
        }
    }

    for pair in &pre.unallowed_pairs {
        for ref_id in assignment.referees_for(&pair.first) {
            if assignment.officiates(ref_id, &pair.second) {
                violations.push(Violation::new(
                    ViolationType::Conflict,
                    ref_id.as_str(),
                    format!(
                        "'{ref_id}' officiates conflicting games '{}' and '{}'",
                        pair.first, pair.second
                    ),
                ));
            }
        }
    }

    for referee in &tournament.referees {
        let finals = pre
            .finals
            .iter()
            .filter(|g| assignment.officiates(&referee.id, g))
            .count();
        if finals > 1 {
            violations.push(Violation::new(
                ViolationType::MultipleFinals,
                referee.id.as_str(),
                format!("'{}' officiates {finals} finals", referee.id),
            ));
        }

        for day in &pre.days {
            let on_day = day
                .games
                .iter()
                .filter(|g| assignment.officiates(&referee.id, g))
                .count();
            if on_day > 0 && !referee.is_available(day.index) {
                violations.push(Violation::new(
                    ViolationType::Unavailable,
                    referee.id.as_str(),
                    format!(
                        "'{}' officiates {on_day} games on unavailable day {}",
                        referee.id, day.index
                    ),
                ));
            }

            for window in day.windows(config.window_size) {
                let count = window
                    .iter()
                    .filter(|g| assignment.officiates(&referee.id, g))
                    .count();
                if count > config.max_in_window as usize {
                    violations.push(Violation::new(
                        ViolationType::ConsecutiveCap,
                        referee.id.as_str(),
                        format!(
                            "'{}' officiates {count} of {} consecutive games starting at '{}'",
                            referee.id,
                            window.len(),
                            window[0]
                        ),
                    ));
                }
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Game;
    use crate::precompute::precompute;
    use chrono::{NaiveDate, NaiveTime};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 8).unwrap()
    }

    fn game(id: &str, h: u32, m: u32, field: &str) -> Game {
        Game::new(id, date(), NaiveTime::from_hms_opt(h, m, 0).unwrap(), field)
    }

    fn referee(id: &str, level: u32) -> Referee {
        Referee::new(id, level).available_on_all(1)
    }

    #[test]
    fn test_valid_colleagues() {
        let refs = vec![referee("X", 1), referee("Y", 1), referee("Z", 1)];
        let pairs = vec![ColleaguePair::new("X", "Y"), ColleaguePair::new("Y", "X")];
        assert!(validate_colleagues(&refs, &pairs).is_ok());
    }

    #[test]
    fn test_referee_in_two_pairs() {
        let refs = vec![referee("X", 1), referee("Y", 1), referee("Z", 1)];
        let pairs = vec![ColleaguePair::new("X", "Y"), ColleaguePair::new("X", "Z")];
        let errs = validate_colleagues(&refs, &pairs).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ValidationErrorKind::ColleagueConflict);
        assert!(errs[0].message.contains("'X'"));
        assert!(errs[0].message.contains("Y, Z"));
    }

    #[test]
    fn test_self_and_unknown_colleagues() {
        let refs = vec![referee("X", 1)];
        let pairs = vec![ColleaguePair::new("X", "X"), ColleaguePair::new("Q", "R")];
        let errs = validate_colleagues(&refs, &pairs).unwrap_err();
        assert!(errs.iter().any(|e| e.kind == ValidationErrorKind::SelfColleague));
        assert_eq!(
            errs.iter()
                .filter(|e| e.kind == ValidationErrorKind::UnknownColleague)
                .count(),
            2
        );
    }

    #[test]
    fn test_validate_tournament_reports_colleagues_as_configuration() {
        let tour = Tournament::new(
            vec![game("g", 9, 0, "Plan 1")],
            vec![referee("X", 1), referee("Y", 1), referee("Z", 1)],
        )
        .with_colleagues(vec![
            ColleaguePair::new("X", "Y"),
            ColleaguePair::new("Z", "X"),
        ]);
        let err = validate_tournament(&tour).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_validate_input_detects_problems() {
        let other_day = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        let tour = Tournament::new(
            vec![
                game("g", 9, 0, "Plan 1"),
                game("g", 10, 0, "Plan 1").with_required_referees(3),
                Game::new("h", other_day, NaiveTime::from_hms_opt(9, 0, 0).unwrap(), "Plan 1"),
            ],
            vec![Referee::new("A", 1).with_availability(vec![true]), referee("A", 1)],
        )
        .with_days(vec![date()]);

        let errs = validate_input(&tour).unwrap_err();
        let kinds: Vec<&ValidationErrorKind> = errs.iter().map(|e| &e.kind).collect();
        assert!(kinds.contains(&&ValidationErrorKind::DuplicateId));
        assert!(kinds.contains(&&ValidationErrorKind::InvalidRefereeCount));
        assert!(kinds.contains(&&ValidationErrorKind::UnknownDay));

        let err = validate_tournament(&tour).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput(_)));
    }

    #[test]
    fn test_short_availability_is_rejected() {
        let next = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        let tour = Tournament::new(
            vec![
                game("a", 9, 0, "Plan 1"),
                Game::new("b", next, NaiveTime::from_hms_opt(9, 0, 0).unwrap(), "Plan 1"),
            ],
            vec![Referee::new("A", 1).with_availability(vec![true])],
        );
        let errs = validate_input(&tour).unwrap_err();
        assert_eq!(errs[0].kind, ValidationErrorKind::AvailabilityLength);
    }

    fn verify(tour: &Tournament, map: &AssignmentMap) -> Vec<ViolationType> {
        let config = PlannerConfig::default();
        let pre = precompute(tour, &config);
        verify_assignment(tour, &pre, map, &config)
            .into_iter()
            .map(|v| v.violation_type)
            .collect()
    }

    #[test]
    fn test_verify_accepts_valid_assignment() {
        let tour = Tournament::new(
            vec![
                game("a", 9, 0, "Plan 1").with_required_referees(1),
                game("b", 9, 30, "Plan 2").with_required_referees(1),
            ],
            vec![referee("R1", 2), referee("R2", 2)],
        );
        let mut map = AssignmentMap::new();
        map.assign("a", "R1");
        map.assign("b", "R2");
        assert!(verify(&tour, &map).is_empty());
    }

    #[test]
    fn test_verify_detects_coverage_conflict_and_qualification() {
        let tour = Tournament::new(
            vec![
                game("a", 9, 0, "Plan 1").with_required_level(2),
                game("b", 9, 30, "Plan 2").with_required_referees(1),
            ],
            vec![referee("R1", 6), referee("R2", 1)],
        );
        let mut map = AssignmentMap::new();
        map.assign("a", "R1");
        map.assign("a", "R2");
        map.assign("b", "R1");
        map.assign("b", "R2");

        let found = verify(&tour, &map);
        assert!(found.contains(&ViolationType::Coverage)); // b has 2
        assert!(found.contains(&ViolationType::Overqualified)); // R1 on a: 6 - 2 > 3
        assert!(found.contains(&ViolationType::Underqualified)); // R2 on a
        assert!(found.contains(&ViolationType::Conflict));
    }

    #[test]
    fn test_verify_detects_colleague_split_finals_and_availability() {
        let tour = Tournament::new(
            vec![
                game("f1", 9, 0, "Plan 1").as_final().with_required_referees(1),
                game("f2", 15, 0, "Plan 1").as_final().with_required_referees(1),
                game("c", 12, 0, "Plan 1"),
            ],
            vec![
                referee("R1", 1),
                referee("R2", 1),
                Referee::new("R3", 1).with_availability(vec![false]),
            ],
        )
        .with_colleagues(vec![ColleaguePair::new("R1", "R2")]);
        let mut map = AssignmentMap::new();
        map.assign("f1", "R1");
        map.assign("f2", "R1");
        map.assign("c", "R1");
        map.assign("c", "R3");

        let found = verify(&tour, &map);
        assert!(found.contains(&ViolationType::MultipleFinals));
        assert!(found.contains(&ViolationType::ColleagueSplit));
        assert!(found.contains(&ViolationType::Unavailable));
        assert!(!found.contains(&ViolationType::Coverage));
    }

    #[test]
    fn test_verify_detects_consecutive_cap() {
        let games: Vec<Game> = (0..5)
            .map(|i| game(&format!("g{i}"), 9 + i, 0, "Plan 1").with_required_referees(1))
            .collect();
        let tour = Tournament::new(games, vec![referee("R1", 1)]);
        let mut map = AssignmentMap::new();
        for i in 0..5 {
            map.assign(&format!("g{i}"), "R1");
        }
        assert_eq!(verify(&tour, &map), vec![ViolationType::ConsecutiveCap]);
    }

    #[test]
    fn test_verify_flags_unknown_entities() {
        let tour = Tournament::new(
            vec![game("a", 9, 0, "Plan 1").with_required_referees(1)],
            vec![referee("R1", 1)],
        );
        let mut map = AssignmentMap::new();
        map.assign("a", "Ghost");
        map.assign("zz", "R1");
        let found = verify(&tour, &map);
        assert_eq!(
            found
                .iter()
                .filter(|v| **v == ViolationType::UnknownEntity)
                .count(),
            2
        );
    }
}
