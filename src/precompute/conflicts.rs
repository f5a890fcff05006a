//! Unallowed-pair derivation.
//!
//! Two games on the same day conflict when they are on different fields and
//! kick off within the conflict window of each other: one referee cannot
//! finish one game and reach the other field in time. Every pair of a day's
//! games has to be checked, so this is quadratic in games per day.

use crate::models::{dedupe_pairs, Game, UnallowedPairs};

/// Derives the conflicts among one day's games.
///
/// `window_seconds` is inclusive: games exactly `window_seconds` apart
/// conflict. Games on the same field never conflict here (the same-field
/// sequence is governed by the consecutive rules instead).
pub fn day_conflicts(games: &[&Game], window_seconds: i64) -> UnallowedPairs {
    let mut found = Vec::new();
    for (i, a) in games.iter().enumerate() {
        for b in &games[i + 1..] {
            if a.field != b.field && a.seconds_apart(b) <= window_seconds {
                found.push((a.id.as_str(), b.id.as_str()));
            }
        }
    }
    dedupe_pairs(found)
}

/// Derives conflicts for every day and merges them into one set.
pub fn unallowed_pairs<'a, I>(days: I, window_seconds: i64) -> UnallowedPairs
where
    I: IntoIterator<Item = Vec<&'a Game>>,
{
    let mut all = UnallowedPairs::new();
    for games in days {
        all.extend(day_conflicts(&games, window_seconds));
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnallowedPair;
    use chrono::{NaiveDate, NaiveTime};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn game(id: &str, h: u32, m: u32, field: &str) -> Game {
        Game::new(
            id,
            NaiveDate::from_ymd_opt(2024, 6, 8).unwrap(),
            NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            field,
        )
    }

    const WINDOW: i64 = 72 * 60;

    #[test]
    fn test_close_games_on_different_fields_conflict() {
        let a = game("a", 9, 0, "Plan 1");
        let b = game("b", 9, 30, "Plan 2");
        let pairs = day_conflicts(&[&a, &b], WINDOW);
        assert_eq!(pairs.len(), 1);
        assert!(pairs.contains(&UnallowedPair::new("b", "a")));
    }

    #[test]
    fn test_same_field_never_conflicts() {
        let a = game("a", 9, 0, "Plan 1");
        let b = game("b", 9, 0, "Plan 1");
        assert!(day_conflicts(&[&a, &b], WINDOW).is_empty());
    }

    #[test]
    fn test_window_is_inclusive() {
        let a = game("a", 9, 0, "Plan 1");
        let at_edge = game("b", 10, 12, "Plan 2");
        let past_edge = game("c", 10, 13, "Plan 3");
        let pairs = day_conflicts(&[&a, &at_edge, &past_edge], WINDOW);
        assert!(pairs.contains(&UnallowedPair::new("a", "b")));
        assert!(!pairs.contains(&UnallowedPair::new("a", "c")));
        // b and c are one minute apart on different fields
        assert!(pairs.contains(&UnallowedPair::new("b", "c")));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_result_is_independent_of_game_order() {
        let games: Vec<Game> = (0..12)
            .map(|i| {
                game(
                    &format!("8-{i}"),
                    9 + i / 3,
                    (i % 3) * 20,
                    &format!("Plan {}", i % 4),
                )
            })
            .collect();
        let refs: Vec<&Game> = games.iter().collect();
        let expected = day_conflicts(&refs, WINDOW);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let mut shuffled = refs.clone();
            shuffled.shuffle(&mut rng);
            assert_eq!(day_conflicts(&shuffled, WINDOW), expected);
        }
    }

    #[test]
    fn test_merging_days_twice_is_idempotent() {
        let a = game("a", 9, 0, "Plan 1");
        let b = game("b", 9, 30, "Plan 2");
        let c = game("c", 9, 45, "Plan 3");
        let once = unallowed_pairs(vec![vec![&a, &b, &c]], WINDOW);
        let twice = unallowed_pairs(vec![vec![&a, &b, &c], vec![&c, &b, &a]], WINDOW);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }
}
