//! Referee scheduling domain models.
//!
//! Immutable value types for the planning input and the decoded output.
//! Nothing here knows about the optimisation model; the builder reads these
//! types and the decoder produces [`AssignmentMap`].
//!
//! | Type | Meaning |
//! |------|---------|
//! | `Game` | One match: date, kick-off, field, group, requirements |
//! | `Referee` | Level and per-day availability |
//! | `ColleaguePair` | Two referees that always work together |
//! | `UnallowedPair` | Two games that cannot share a referee |
//! | `Day` | Games of one date, chronological and per field |
//! | `AssignmentMap` | Game → primary/secondary referee |

mod conflict;
mod day;
mod game;
mod referee;
mod schedule;
mod tournament;

pub use conflict::{dedupe_pairs, UnallowedPair, UnallowedPairs};
pub use day::{Day, FieldSequence};
pub use game::Game;
pub use referee::{ColleaguePair, Referee};
pub use schedule::{AssignmentMap, RefereeAssignment, Violation, ViolationType};
pub use tournament::Tournament;
