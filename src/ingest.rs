//! Typed input records and their conversion into a [`Tournament`].
//!
//! The records are what a spreadsheet or JSON reader hands over, one row
//! per game or referee. Reading files is up to the caller; this module only
//! derives the planning attributes:
//!
//! | Attribute | Derivation |
//! |-----------|------------|
//! | game id | `"{day_of_month}-{row}"`, row = position within its day |
//! | required referees | 1 when the group contains the pool marker, else 2 |
//! | required level | level of the longest group key contained in the group |
//! | final | round label equals the final label |
//! | availability | nonzero flag = available |
//! | colleague pairs | one per referee naming a colleague, deduplicated |

use chrono::{Datelike, NaiveDate, NaiveTime};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::PlannerConfig;
use crate::error::{PlanError, Result};
use crate::models::{ColleaguePair, Game, Referee, Tournament};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Group key → required referee level.
pub type GroupLevels = BTreeMap<String, u32>;

/// One game row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub field: String,
    pub group: String,
    pub round: String,
}

/// One referee row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefereeRecord {
    pub name: String,
    pub level: u32,
    /// One flag per day sheet, in sheet order.
    pub available: Vec<u8>,
    #[serde(default)]
    pub colleague: Option<String>,
}

/// Everything the reader collaborator supplies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentInput {
    /// Game rows, one inner vec per day sheet.
    pub days: Vec<Vec<GameRecord>>,
    pub referees: Vec<RefereeRecord>,
    pub group_levels: GroupLevels,
}

impl TournamentInput {
    /// Parses input from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            PlanError::InvalidInput(vec![ValidationError::new(
                ValidationErrorKind::Malformed,
                e.to_string(),
            )])
        })
    }
}

/// Level for a group: the longest key contained in `group`; equal lengths
/// resolve to the first key in key order.
pub fn level_for_group(levels: &GroupLevels, group: &str) -> Option<u32> {
    levels
        .iter()
        .filter(|(key, _)| group.contains(key.as_str()))
        .min_by_key(|(key, _)| std::cmp::Reverse(key.len()))
        .map(|(_, &level)| level)
}

/// Converts one game row.
pub fn game_from_record(
    record: &GameRecord,
    row: usize,
    levels: &GroupLevels,
    config: &PlannerConfig,
) -> Result<Game> {
    let id = format!("{}-{}", record.date.day(), row);
    let level = level_for_group(levels, &record.group).ok_or_else(|| PlanError::UnknownGroup {
        game: id.clone(),
        group: record.group.clone(),
    })?;
    let required = if record.group.contains(config.pool_marker.as_str()) {
        1
    } else {
        2
    };

    let game = Game::new(id, record.date, record.time, record.field.clone())
        .with_group(record.group.clone())
        .with_round(record.round.clone())
        .with_required_referees(required)
        .with_required_level(level);
    Ok(if record.round == config.final_round_label {
        game.as_final()
    } else {
        game
    })
}

/// Converts one referee row.
pub fn referee_from_record(record: &RefereeRecord) -> Referee {
    Referee::new(record.name.clone(), record.level)
        .with_availability(record.available.iter().map(|&flag| flag != 0).collect())
}

/// Canonical, deduplicated colleague pairs named by the roster.
pub fn colleague_pairs(records: &[RefereeRecord]) -> Vec<ColleaguePair> {
    records
        .iter()
        .filter_map(|r| {
            let colleague = r.colleague.as_deref()?.trim();
            (!colleague.is_empty()).then(|| ColleaguePair::new(r.name.clone(), colleague))
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Builds the planning input.
///
/// Day `t` is the `t`-th day sheet; its date is taken from its rows.
///
/// Every row is examined before failing, so one error lists all empty
/// sheets, misdated rows and groups with no level.
///
/// # Errors
/// [`PlanError::InvalidInput`] for an empty day sheet, a sheet mixing
/// dates, or a group with no level ([`ValidationErrorKind::UnknownGroup`])
pub fn prepare(input: &TournamentInput, config: &PlannerConfig) -> Result<Tournament> {
    let mut days = Vec::with_capacity(input.days.len());
    let mut games = Vec::new();
    let mut problems = Vec::new();

    for (t, sheet) in input.days.iter().enumerate() {
        let Some(date) = sheet.first().map(|r| r.date) else {
            problems.push(ValidationError::new(
                ValidationErrorKind::UnknownDay,
                format!("Day sheet {t} has no games"),
            ));
            continue;
        };
        days.push(date);

        for (row, record) in sheet.iter().enumerate() {
            if record.date != date {
                problems.push(ValidationError::new(
                    ValidationErrorKind::UnknownDay,
                    format!(
                        "Row {row} of day sheet {t} is dated {}, sheet is {date}",
                        record.date
                    ),
                ));
                continue;
            }
            match game_from_record(record, row, &input.group_levels, config) {
                Ok(game) => games.push(game),
                Err(e @ PlanError::UnknownGroup { .. }) => problems.push(ValidationError::new(
                    ValidationErrorKind::UnknownGroup,
                    e.to_string(),
                )),
                Err(e) => return Err(e),
            }
        }
        debug!("Day {t} ({date}): {} games", sheet.len());
    }

    if !problems.is_empty() {
        return Err(PlanError::InvalidInput(problems));
    }

    let referees: Vec<Referee> = input.referees.iter().map(referee_from_record).collect();
    let colleagues = colleague_pairs(&input.referees);
    info!(
        "Prepared {} games over {} days, {} referees, {} colleague pairs",
        games.len(),
        days.len(),
        referees.len(),
        colleagues.len()
    );

    Ok(Tournament::new(games, referees)
        .with_colleagues(colleagues)
        .with_days(days))
}
