//! Standings aggregation and season-outcome projection.
//!
//! Everything in here is a pure, synchronous function of already-fetched
//! match rows: no database handles, no caching between calls.
//!
//! Pipeline:
//! - **aggregate**: fold matches into one `StandingsRow` per team (home/away split)
//! - **sort_key**: points, goal difference and the table order
//! - **projection**: reachable points range and expected final points
//! - **thresholds**: safe / required points from the boundary teams' pace
//! - **rank_range**: best and worst reachable final position
//! - **history**: per-match progressions, form and head-to-head tallies
//! - **table**: assembles all of the above into one table page

pub mod aggregate;
pub mod history;
pub mod projection;
pub mod rank_range;
pub mod sort_key;
pub mod table;
pub mod thresholds;

use thiserror::Error;

use crate::db::models::TeamId;

pub use aggregate::{aggregate, StandingsRow};
pub use projection::{project, ProjectionInterval};
pub use table::{LeagueTable, TableEntry};
pub use thresholds::Zone;

/// Malformed input that fails a single table render.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StandingsError {
    #[error("team {team_id} has played {played} matches but the season only has {num_matches}")]
    PlayedExceedsSeason {
        team_id: TeamId,
        played: u32,
        num_matches: u32,
    },

    #[error("goal difference {goal_difference} does not fit the legacy sort value")]
    GoalDifferenceOutOfRange { goal_difference: i32 },

    #[error("match {match_id} has a negative score")]
    NegativeScore { match_id: i64 },

    #[error("season {season_id} has no full-season match count")]
    SeasonWithoutMatches { season_id: i64 },
}

pub type Result<T> = std::result::Result<T, StandingsError>;
