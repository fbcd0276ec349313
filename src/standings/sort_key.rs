//! Points, goal difference and table order.
//!
//! The table is ordered by points, then goal difference, then goals scored,
//! all descending. Rows still level after that keep the order they were
//! supplied in; there is no further tie-break.

use serde::Serialize;
use std::cmp::Reverse;

use super::aggregate::StandingsRow;
use crate::db::models::TeamId;

pub const WIN_POINTS: i32 = 3;
pub const DRAW_POINTS: i32 = 1;

/// League points including bonus points (and deductions).
pub fn points(row: &StandingsRow) -> i32 {
    WIN_POINTS * row.wins() as i32 + DRAW_POINTS * row.draws() as i32 + row.bonus_points
}

/// League points earned on the pitch, bonus points excluded.
pub fn points_earned(row: &StandingsRow) -> i32 {
    points(row) - row.bonus_points
}

/// Lexicographic table key; greater sorts higher in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SortKey {
    pub points: i32,
    pub goal_difference: i32,
    pub goals_for: u32,
}

pub fn sort_key(row: &StandingsRow) -> SortKey {
    SortKey {
        points: points(row),
        goal_difference: row.goal_difference(),
        goals_for: row.goals_for(),
    }
}

/// A standings row placed in the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    /// 1-based table position
    pub position: usize,
    pub team_id: TeamId,
    pub row: StandingsRow,
    pub points: i32,
    pub goal_difference: i32,
    pub sort_key: SortKey,
}

impl RankedRow {
    pub fn played(&self) -> u32 {
        self.row.played()
    }
}

/// Order rows into a table. The sort is stable, so equal keys keep input order.
pub fn rank(rows: Vec<(TeamId, StandingsRow)>) -> Vec<RankedRow> {
    let mut keyed: Vec<(SortKey, TeamId, StandingsRow)> = rows
        .into_iter()
        .map(|(team_id, row)| (sort_key(&row), team_id, row))
        .collect();
    keyed.sort_by_key(|(key, _, _)| Reverse(*key));

    keyed
        .into_iter()
        .enumerate()
        .map(|(index, (key, team_id, row))| RankedRow {
            position: index + 1,
            team_id,
            row,
            points: key.points,
            goal_difference: key.goal_difference,
            sort_key: key,
        })
        .collect()
}

/// The historical single-number sort value: goal difference packed into the
/// fractional part of the points, `points + gd / 1000`.
///
/// Only kept to reproduce old output exactly; the table itself is ordered by
/// [`SortKey`].
pub mod legacy {
    use crate::standings::{Result, StandingsError};

    /// Differences this wide would spill into the integer part.
    pub const MAX_GOAL_DIFFERENCE: i32 = 499;

    pub fn encode(points: i32, goal_difference: i32) -> Result<f64> {
        if goal_difference.abs() > MAX_GOAL_DIFFERENCE {
            return Err(StandingsError::GoalDifferenceOutOfRange { goal_difference });
        }
        Ok(points as f64 + goal_difference as f64 / 1000.0)
    }

    /// Goal difference recovered from the fractional part. Values above 500
    /// wrap round to negative differences.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn goal_difference(value: f64) -> i32 {
        let gd = (value.rem_euclid(1.0) * 1000.0).round() as i32;
        if gd > 500 {
            gd - 1000
        } else {
            gd
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn decode(value: f64) -> (i32, i32) {
        let gd = goal_difference(value);
        let points = (value - gd as f64 / 1000.0).round() as i32;
        (points, gd)
    }
}
