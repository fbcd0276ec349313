//! Final-points projection for a season in progress.
//!
//! Three ranges are produced for every team:
//!   - the absolute range: lose every remaining match .. win every one
//!   - a confidence band inside it, used for visual emphasis
//!   - the expected final points, a straight extrapolation of the current pace
//!
//! Confidence band, with `r` matches remaining and `ppg` the points per game
//! earned so far (bonus points excluded):
//!   r <= 2:  [actual, actual + 3r]
//!   r >  2:  [actual + ppg/2 · (r-2),  actual + 6 + (3+ppg)/2 · (r-2)]
//!
//! The next two matches are treated as fully open (0 or 3 points each) and
//! only the rest are narrowed, by halving the pace for the floor and
//! averaging it with a perfect 3 points per game for the ceiling. The
//! blending constants are a presentation choice, not a fitted model.

use serde::Serialize;

use super::aggregate::StandingsRow;
use super::sort_key::{points, points_earned, WIN_POINTS};
use super::{Result, StandingsError};
use crate::db::models::{Season, TeamId};

/// Matches at the start of the remaining schedule left fully open.
const OPEN_MATCHES: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProjectionInterval {
    /// Current points: the team loses every remaining match
    pub min_points: i32,
    /// The team wins every remaining match
    pub max_points: i32,
    /// Current pace extended over the remaining matches
    pub expected_points: f64,
    pub confidence_min: f64,
    pub confidence_max: f64,
    pub played: u32,
    pub remaining: u32,
}

impl ProjectionInterval {
    /// True when the team has no results to extrapolate from.
    pub fn is_empty(&self) -> bool {
        self.played == 0
    }
}

/// Project a team's final points from its standings row.
///
/// A team that has not played yet gets the all-zero interval.
pub fn project(team_id: TeamId, row: &StandingsRow, season: &Season) -> Result<ProjectionInterval> {
    let played = row.played();
    if played == 0 {
        return Ok(ProjectionInterval::default());
    }
    if season.num_matches == 0 {
        return Err(StandingsError::SeasonWithoutMatches {
            season_id: season.id,
        });
    }
    if played > season.num_matches {
        return Err(StandingsError::PlayedExceedsSeason {
            team_id,
            played,
            num_matches: season.num_matches,
        });
    }
    Ok(project_points(
        points(row),
        points_earned(row),
        played,
        season.num_matches - played,
    ))
}

/// Projection from raw totals.
///
/// `actual_points` includes bonus points; `points_earned` does not, so bonus
/// points never compound into the per-game rate.
pub fn project_points(
    actual_points: i32,
    points_earned: i32,
    played: u32,
    remaining: u32,
) -> ProjectionInterval {
    if played == 0 {
        return ProjectionInterval::default();
    }

    let actual = actual_points as f64;
    let per_game = points_earned as f64 / played as f64;
    let max_points = actual_points + WIN_POINTS * remaining as i32;

    let (confidence_min, confidence_max) = if remaining <= OPEN_MATCHES {
        (actual, max_points as f64)
    } else {
        let smoothed = (remaining - OPEN_MATCHES) as f64;
        let lower_rate = per_game / 2.0;
        let upper_rate = (WIN_POINTS as f64 + per_game) / 2.0;
        (
            actual + lower_rate * smoothed,
            actual + (WIN_POINTS * OPEN_MATCHES as i32) as f64 + upper_rate * smoothed,
        )
    };

    ProjectionInterval {
        min_points: actual_points,
        max_points,
        expected_points: actual + per_game * remaining as f64,
        confidence_min,
        confidence_max,
        played,
        remaining,
    }
}
