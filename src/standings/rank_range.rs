//! Best and worst final table position still reachable.
//!
//! Every team is reduced to a floor (points now) and a ceiling (points if it
//! wins out), each paired with a goal difference. For the other teams the
//! goal difference is widened by two goals per remaining match in their
//! favour (floor minus, ceiling plus), so a rival that could still overtake
//! on goal difference alone counts as able to finish above.

use serde::Serialize;
use std::fmt;

use super::projection::ProjectionInterval;
use super::sort_key::WIN_POINTS;
use crate::db::models::TeamId;

/// Goals per remaining match a rival may still swing its goal difference by.
const GOAL_SWING_PER_MATCH: i32 = 2;

/// Points with goal difference as tie-break; compares lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ProjectedBound {
    pub points: i32,
    pub goal_difference: i32,
}

/// One team's reachable points range, as seen by the rank estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Contender {
    pub team_id: TeamId,
    pub min_points: i32,
    pub max_points: i32,
    pub goal_difference: i32,
    pub remaining: u32,
}

impl Contender {
    pub fn new(
        team_id: TeamId,
        projection: &ProjectionInterval,
        points: i32,
        goal_difference: i32,
        num_matches: u32,
    ) -> Self {
        if projection.is_empty() {
            // unplayed: bonus points only, whole season ahead
            return Self {
                team_id,
                min_points: points,
                max_points: points + WIN_POINTS * num_matches as i32,
                goal_difference,
                remaining: num_matches,
            };
        }
        Self {
            team_id,
            min_points: projection.min_points,
            max_points: projection.max_points,
            goal_difference,
            remaining: projection.remaining,
        }
    }

    fn swing(&self) -> i32 {
        GOAL_SWING_PER_MATCH * self.remaining as i32
    }

    /// Own floor at the current goal difference.
    pub fn floor(&self) -> ProjectedBound {
        ProjectedBound {
            points: self.min_points,
            goal_difference: self.goal_difference,
        }
    }

    /// Own ceiling at the current goal difference.
    pub fn ceiling(&self) -> ProjectedBound {
        ProjectedBound {
            points: self.max_points,
            goal_difference: self.goal_difference,
        }
    }

    /// Floor as a rival: goal difference may still drop.
    pub fn rival_floor(&self) -> ProjectedBound {
        ProjectedBound {
            points: self.min_points,
            goal_difference: self.goal_difference - self.swing(),
        }
    }

    /// Ceiling as a rival: goal difference may still improve.
    pub fn rival_ceiling(&self) -> ProjectedBound {
        ProjectedBound {
            points: self.max_points,
            goal_difference: self.goal_difference + self.swing(),
        }
    }
}

/// Reachable final positions, 1-based; `best <= worst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankRange {
    pub best: usize,
    pub worst: usize,
}

impl RankRange {
    pub fn is_settled(&self) -> bool {
        self.best == self.worst
    }
}

impl fmt::Display for RankRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_settled() {
            write!(f, "{}", self.best)
        } else {
            write!(f, "{}-{}", self.best, self.worst)
        }
    }
}

/// Bound the final position of `team` against everyone in `field`.
///
/// - best: one more than the rivals whose floor is already above the team's
///   ceiling, so they finish above whatever happens
/// - worst: one more than the rivals whose ceiling reaches the team's floor,
///   so they could still finish level or above
///
/// `team` itself may appear in `field`; it is skipped.
pub fn estimate_rank_range(team: &Contender, field: &[Contender]) -> RankRange {
    let floor = team.floor();
    let ceiling = team.ceiling();
    let rivals = || field.iter().filter(|other| other.team_id != team.team_id);

    let certainly_above = rivals().filter(|other| other.rival_floor() > ceiling).count();
    let possibly_above = rivals().filter(|other| other.rival_ceiling() >= floor).count();

    RankRange {
        best: 1 + certainly_above,
        worst: 1 + possibly_above,
    }
}

/// Rank range of every contender, in input order.
pub fn estimate_rank_ranges(field: &[Contender]) -> Vec<RankRange> {
    field
        .iter()
        .map(|team| estimate_rank_range(team, field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contender(team_id: TeamId, points: i32, goal_difference: i32, remaining: u32) -> Contender {
        Contender {
            team_id,
            min_points: points,
            max_points: points + 3 * remaining as i32,
            goal_difference,
            remaining,
        }
    }

    #[test]
    fn three_team_scenario() {
        // 4-match season, everyone has played 2
        let field = vec![
            contender(1, 6, 3, 2),
            contender(2, 4, 1, 2),
            contender(3, 0, -4, 2),
        ];
        let ranges = estimate_rank_ranges(&field);

        // C can reach 6 points but its goal difference cannot pass A's floor
        assert_eq!(ranges[0], RankRange { best: 1, worst: 2 });
        assert_eq!(ranges[1], RankRange { best: 1, worst: 3 });
        assert_eq!(ranges[2], RankRange { best: 2, worst: 3 });
        assert!(ranges[2].best <= 3);
    }

    #[test]
    fn unreachable_leader_is_settled_first() {
        let field = vec![
            contender(1, 30, 10, 2),
            contender(2, 20, 5, 2),
            contender(3, 18, 0, 2),
        ];
        let ranges = estimate_rank_ranges(&field);
        assert_eq!(ranges[0], RankRange { best: 1, worst: 1 });
        assert!(ranges[0].is_settled());
        assert_eq!(ranges[0].to_string(), "1");
    }

    #[test]
    fn finished_season_ranks_are_exact() {
        let field = vec![
            contender(1, 50, 20, 0),
            contender(2, 50, 12, 0),
            contender(3, 41, -3, 0),
        ];
        let ranges = estimate_rank_ranges(&field);
        assert_eq!(ranges[0], RankRange { best: 1, worst: 1 });
        assert_eq!(ranges[1], RankRange { best: 2, worst: 2 });
        assert_eq!(ranges[2], RankRange { best: 3, worst: 3 });
    }

    #[test]
    fn goal_swing_keeps_close_rivals_in_play() {
        // Level on points with one match left: a 2-goal gap can still be closed
        let field = vec![contender(1, 40, 2, 1), contender(2, 40, 0, 1)];
        let ranges = estimate_rank_ranges(&field);
        assert_eq!(ranges[0], RankRange { best: 1, worst: 2 });
        assert_eq!(ranges[1], RankRange { best: 1, worst: 2 });
    }

    #[test]
    fn best_never_exceeds_worst() {
        let mut field = Vec::new();
        for i in 0..12 {
            field.push(contender(i, (i as i32 * 7) % 23, (i as i32 * 5) % 11 - 5, (i % 4) as u32));
        }
        for range in estimate_rank_ranges(&field) {
            assert!(range.best <= range.worst);
            assert!(range.worst <= field.len());
        }
    }

    #[test]
    fn unplayed_team_keeps_the_whole_season_open() {
        let c = Contender::new(4, &ProjectionInterval::default(), -2, 0, 10);
        assert_eq!(c.min_points, -2);
        assert_eq!(c.max_points, 28);
        assert_eq!(c.remaining, 10);
    }

    #[test]
    fn display_shows_a_range() {
        assert_eq!(RankRange { best: 3, worst: 7 }.to_string(), "3-7");
    }
}
