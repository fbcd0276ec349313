//! Safe and required points targets, and table zones.
//!
//! A target is taken from the two teams straddling a boundary: each team's
//! points per game is extended over the full season and the two results
//! are averaged (both rounded up).

use serde::Serialize;

use super::sort_key::RankedRow;
use crate::db::models::{Boundary, Season};

/// Display-only reference lines. `0` means "not computable yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    /// Points expected to avoid relegation
    pub safe_points: i32,
    /// Points expected to reach the qualification places
    pub required_points: i32,
}

impl Thresholds {
    pub fn safe(&self) -> Option<i32> {
        (self.safe_points != 0).then_some(self.safe_points)
    }

    pub fn required(&self) -> Option<i32> {
        (self.required_points != 0).then_some(self.required_points)
    }
}

/// Colour band of a table position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Qualification,
    SecondaryQualification,
    Neutral,
    Relegation,
}

/// Zone of a 1-based `position` under the season's boundaries.
pub fn zone(position: usize, season: &Season) -> Zone {
    let within = |kind| season.boundary(kind).is_some_and(|pos| position <= pos);

    if within(Boundary::Qualification) {
        Zone::Qualification
    } else if within(Boundary::SecondaryQualification) {
        Zone::SecondaryQualification
    } else if season
        .boundary(Boundary::Relegation)
        .is_some_and(|pos| position > pos)
    {
        Zone::Relegation
    } else {
        Zone::Neutral
    }
}

/// Full-season points at the team's current pace, rounded up.
fn full_season_pace(row: &RankedRow, num_matches: u32) -> Option<i32> {
    let played = row.played();
    if played == 0 {
        return None;
    }
    Some((num_matches as f64 * row.points as f64 / played as f64).ceil() as i32)
}

/// Target for the boundary after 1-based `position`, from the teams at
/// `position` and `position + 1`.
fn boundary_target(table: &[RankedRow], position: usize, num_matches: u32) -> i32 {
    if position == 0 || table.len() < position + 1 {
        return 0;
    }
    let above = full_season_pace(&table[position - 1], num_matches);
    let below = full_season_pace(&table[position], num_matches);
    match (above, below) {
        (Some(above), Some(below)) => ((above + below) as f64 / 2.0).ceil() as i32,
        _ => 0,
    }
}

/// Safe and required points for a points-sorted table.
pub fn estimate_thresholds(table: &[RankedRow], season: &Season) -> Thresholds {
    let target = |kind| {
        season
            .boundary(kind)
            .map(|pos| boundary_target(table, pos, season.num_matches))
            .unwrap_or(0)
    };
    Thresholds {
        safe_points: target(Boundary::Relegation),
        required_points: target(Boundary::Qualification),
    }
}
