//! Per-match views of a single team's season.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::projection::{project_points, ProjectionInterval};
use crate::db::models::{Match, Outcome, TeamId};

/// Standing of a team right after one of its matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressPoint {
    /// 1-based count of matches played so far
    pub match_number: usize,
    pub date: Option<NaiveDate>,
    pub points: i32,
    pub goal_difference: i32,
}

impl ProgressPoint {
    fn key(&self) -> (i32, i32) {
        (self.points, self.goal_difference)
    }
}

/// True when `m` falls on or before `limit`. Undated matches only pass
/// without a limit.
pub fn on_or_before(m: &Match, limit: Option<NaiveDate>) -> bool {
    match limit {
        Some(limit) => m.date.is_some_and(|date| date <= limit),
        None => true,
    }
}

/// Finished matches of `team` in date order. Undated matches sort first.
pub fn team_matches(matches: &[Match], team: TeamId) -> Vec<&Match> {
    let mut played: Vec<&Match> = matches
        .iter()
        .filter(|m| m.is_played() && m.involves(team))
        .collect();
    played.sort_by_key(|m| m.date);
    played
}

/// The `n` most recent finished matches of `team` on or before `up_to`,
/// newest first.
pub fn recent_matches(
    matches: &[Match],
    team: TeamId,
    up_to: Option<NaiveDate>,
    n: usize,
) -> Vec<&Match> {
    let mut played: Vec<&Match> = team_matches(matches, team)
        .into_iter()
        .filter(|m| on_or_before(m, up_to))
        .collect();
    played.reverse();
    played.truncate(n);
    played
}

/// Cumulative points and goal difference after each match.
pub fn points_progression(matches: &[Match], team: TeamId, include_bonus: bool) -> Vec<ProgressPoint> {
    let mut points = 0;
    let mut goal_difference = 0;
    let mut progression = Vec::new();

    for (index, m) in team_matches(matches, team).into_iter().enumerate() {
        let (Some((scored, conceded)), Some(outcome)) = (m.goals_for(team), m.outcome_for(team))
        else {
            continue;
        };
        points += outcome.points();
        if include_bonus {
            points += m.bonus_points_for(team);
        }
        goal_difference += scored - conceded;
        progression.push(ProgressPoint {
            match_number: index + 1,
            date: m.date,
            points,
            goal_difference,
        });
    }
    progression
}

/// Points taken over the last `window` matches at each point of the
/// progression. Early entries cover fewer matches.
pub fn rolling_points(progression: &[ProgressPoint], window: usize) -> Vec<i32> {
    progression
        .iter()
        .enumerate()
        .map(|(i, p)| match i.checked_sub(window) {
            Some(start) => p.points - progression[start].points,
            None => p.points,
        })
        .collect()
}

/// Table position of `team` after each of its matches.
///
/// Every other team is compared at the same match number, or at its latest
/// match if it has played fewer. A rival level on points and goal
/// difference counts as half a place, and the position is rounded down.
pub fn position_history(matches: &[Match], team: TeamId, teams: &[TeamId]) -> Vec<usize> {
    let own = points_progression(matches, team, true);
    let others: Vec<Vec<ProgressPoint>> = teams
        .iter()
        .filter(|&&other| other != team)
        .map(|&other| points_progression(matches, other, true))
        .filter(|progression| !progression.is_empty())
        .collect();

    own.iter()
        .enumerate()
        .map(|(i, mine)| {
            let mut place = 1.0;
            for other in &others {
                let theirs = other[i.min(other.len() - 1)];
                if theirs.key() > mine.key() {
                    place += 1.0;
                } else if theirs.key() == mine.key() {
                    place += 0.5;
                }
            }
            f64::floor(place) as usize
        })
        .collect()
}

/// The final-points projection as it stood after each match, bonus points
/// excluded.
pub fn prediction_history(matches: &[Match], team: TeamId, num_matches: u32) -> Vec<ProjectionInterval> {
    points_progression(matches, team, false)
        .iter()
        .map(|p| {
            let played = p.match_number as u32;
            project_points(p.points, p.points, played, num_matches.saturating_sub(played))
        })
        .collect()
}

/// Latest results of a team, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Form {
    pub results: Vec<Outcome>,
    pub points: i32,
}

pub fn recent_form(matches: &[Match], team: TeamId, up_to: Option<NaiveDate>, n: usize) -> Form {
    let results: Vec<Outcome> = recent_matches(matches, team, up_to, n)
        .into_iter()
        .filter_map(|m| m.outcome_for(team))
        .collect();
    let points = results.iter().map(|o| o.points()).sum();
    Form { results, points }
}

/// Count of finished matches by winning margin, margins outside
/// `[min_margin, max_margin]` clamped into the end buckets. Every bucket is
/// present, including empty ones.
pub fn result_distribution(
    matches: &[Match],
    team: TeamId,
    min_margin: i32,
    max_margin: i32,
) -> BTreeMap<i32, u32> {
    let mut buckets: BTreeMap<i32, u32> = (min_margin..=max_margin).map(|m| (m, 0)).collect();
    for m in matches {
        if let Some((scored, conceded)) = m.goals_for(team) {
            let margin = (scored - conceded).clamp(min_margin, max_margin);
            *buckets.entry(margin).or_insert(0) += 1;
        }
    }
    buckets
}

/// Points won, dropped and still open against one opponent over the home
/// and away fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeadToHead {
    pub opponent: TeamId,
    pub good_points: i32,
    pub available_points: i32,
    pub bad_points: i32,
}

pub fn head_to_head(matches: &[Match], team: TeamId, opponents: &[TeamId]) -> Vec<HeadToHead> {
    opponents
        .iter()
        .filter(|&&opponent| opponent != team)
        .map(|&opponent| {
            let mut tally = HeadToHead {
                opponent,
                good_points: 0,
                available_points: 0,
                bad_points: 0,
            };
            for (home, away) in [(team, opponent), (opponent, team)] {
                let fixture = matches
                    .iter()
                    .find(|m| m.home_team_id == home && m.away_team_id == away && m.is_played());
                match fixture.and_then(|m| m.outcome_for(team)) {
                    None => tally.available_points += 3,
                    Some(Outcome::Draw) => {
                        tally.good_points += 1;
                        tally.bad_points += 1;
                    }
                    Some(Outcome::Win) => tally.good_points += 3,
                    Some(Outcome::Loss) => tally.bad_points += 3,
                }
            }
            tally
        })
        .collect()
}
