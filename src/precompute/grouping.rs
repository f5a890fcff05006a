//! Day and field grouping.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Day, FieldSequence, Game};

/// Sorts a day's games by kick-off, keeping input order for ties.
pub fn chronological<'a>(games: &[&'a Game]) -> Vec<&'a Game> {
    let mut sorted = games.to_vec();
    sorted.sort_by_key(|g| g.start);
    sorted
}

/// Builds one [`Day`] from its games.
///
/// Fields come out ordered by name; within a field games are ordered by
/// kick-off. `non_final` drops finals, which are exempt from the
/// consecutive-attendance rule.
pub fn build_day(index: usize, date: chrono::NaiveDate, games: &[&Game]) -> Day {
    let ordered = chronological(games);

    let mut by_field: BTreeMap<&str, Vec<&Game>> = BTreeMap::new();
    for &g in &ordered {
        by_field.entry(g.field.as_str()).or_default().push(g);
    }

    let fields = by_field
        .into_iter()
        .map(|(field, games)| FieldSequence {
            field: field.to_string(),
            games: games.iter().map(|g| g.id.clone()).collect(),
            non_final: games
                .iter()
                .filter(|g| !g.is_final)
                .map(|g| g.id.clone())
                .collect(),
        })
        .collect();

    Day {
        index,
        date,
        games: ordered.iter().map(|g| g.id.clone()).collect(),
        fields,
    }
}

/// Ids of all final games.
pub fn finals(games: &[Game]) -> BTreeSet<String> {
    games
        .iter()
        .filter(|g| g.is_final)
        .map(|g| g.id.clone())
        .collect()
}
