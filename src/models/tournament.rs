//! Tournament (planning input) model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ColleaguePair, Game, Referee};

/// Everything one planning run needs: games, roster, colleague pairs, and
/// the ordered list of tournament days.
///
/// Day index `t` is the position of a date in `days`; it is the index used
/// for referee availability and per-day target load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    /// Games, in input order.
    pub games: Vec<Game>,
    /// Referee roster, in input order.
    pub referees: Vec<Referee>,
    /// Colleague pairs.
    pub colleagues: Vec<ColleaguePair>,
    /// Tournament days in order.
    pub days: Vec<NaiveDate>,
}

impl Tournament {
    /// Creates a tournament whose days are the distinct game dates, ascending.
    pub fn new(games: Vec<Game>, referees: Vec<Referee>) -> Self {
        let mut days: Vec<NaiveDate> = games.iter().map(|g| g.date).collect();
        days.sort();
        days.dedup();
        Self {
            games,
            referees,
            colleagues: Vec::new(),
            days,
        }
    }

    /// Sets the colleague pairs.
    pub fn with_colleagues(mut self, colleagues: Vec<ColleaguePair>) -> Self {
        self.colleagues = colleagues;
        self
    }

    /// Overrides the day order.
    pub fn with_days(mut self, days: Vec<NaiveDate>) -> Self {
        self.days = days;
        self
    }

    /// Number of tournament days.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Day index of a date.
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        self.days.iter().position(|d| *d == date)
    }

    /// Finds a game by id.
    pub fn game(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    /// Finds a referee by id.
    pub fn referee(&self, id: &str) -> Option<&Referee> {
        self.referees.iter().find(|r| r.id == id)
    }

    /// Games played on day `t`, in input order.
    pub fn games_on_day(&self, t: usize) -> Vec<&Game> {
        match self.days.get(t) {
            Some(date) => self.games.iter().filter(|g| g.date == *date).collect(),
            None => Vec::new(),
        }
    }
}
