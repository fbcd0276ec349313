//! Fold match results into per-team standings rows.

use serde::Serialize;

use super::{Result, StandingsError};
use crate::db::models::{Match, Outcome, TeamId};

/// Results of one team over a set of matches, home and away kept apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StandingsRow {
    pub home_wins: u32,
    pub home_draws: u32,
    pub home_losses: u32,
    pub home_for: u32,
    pub home_against: u32,
    pub away_wins: u32,
    pub away_draws: u32,
    pub away_losses: u32,
    pub away_for: u32,
    pub away_against: u32,
    /// May be negative (points deductions)
    pub bonus_points: i32,
}

impl StandingsRow {
    pub fn home_played(&self) -> u32 {
        self.home_wins + self.home_draws + self.home_losses
    }

    pub fn away_played(&self) -> u32 {
        self.away_wins + self.away_draws + self.away_losses
    }

    pub fn played(&self) -> u32 {
        self.home_played() + self.away_played()
    }

    pub fn wins(&self) -> u32 {
        self.home_wins + self.away_wins
    }

    pub fn draws(&self) -> u32 {
        self.home_draws + self.away_draws
    }

    pub fn losses(&self) -> u32 {
        self.home_losses + self.away_losses
    }

    pub fn goals_for(&self) -> u32 {
        self.home_for + self.away_for
    }

    pub fn goals_against(&self) -> u32 {
        self.home_against + self.away_against
    }

    pub fn goal_difference(&self) -> i32 {
        self.goals_for() as i32 - self.goals_against() as i32
    }

    /// Fractions of matches won, drawn and lost. All zero before the first match.
    pub fn ratio(&self) -> (f64, f64, f64) {
        let played = self.played();
        if played == 0 {
            return (0.0, 0.0, 0.0);
        }
        let played = played as f64;
        (
            self.wins() as f64 / played,
            self.draws() as f64 / played,
            self.losses() as f64 / played,
        )
    }

    /// Count one finished match for `team`. Matches the team is not part
    /// of, and scheduled fixtures, are ignored.
    pub fn record(&mut self, m: &Match, team: TeamId) {
        let (Some((scored, conceded)), Some(outcome)) = (m.goals_for(team), m.outcome_for(team))
        else {
            return;
        };
        let scored = scored.max(0) as u32;
        let conceded = conceded.max(0) as u32;

        if m.home_team_id == team {
            match outcome {
                Outcome::Win => self.home_wins += 1,
                Outcome::Draw => self.home_draws += 1,
                Outcome::Loss => self.home_losses += 1,
            }
            self.home_for += scored;
            self.home_against += conceded;
        } else {
            match outcome {
                Outcome::Win => self.away_wins += 1,
                Outcome::Draw => self.away_draws += 1,
                Outcome::Loss => self.away_losses += 1,
            }
            self.away_for += scored;
            self.away_against += conceded;
        }
        self.bonus_points += m.bonus_points_for(team);
    }
}

/// Reject finished matches with a negative goal count.
pub fn check_scores(matches: &[Match]) -> Result<()> {
    match matches
        .iter()
        .find(|m| m.score().is_some_and(|(home, away)| home < 0 || away < 0))
    {
        Some(m) => Err(StandingsError::NegativeScore {
            match_id: m.id.unwrap_or_default(),
        }),
        None => Ok(()),
    }
}

/// Standings row of a single team over `matches`.
pub fn aggregate<'a, I>(matches: I, team: TeamId) -> StandingsRow
where
    I: IntoIterator<Item = &'a Match>,
{
    let mut row = StandingsRow::default();
    for m in matches {
        row.record(m, team);
    }
    row
}

/// Standings rows for every team in `teams`, in the order given.
///
/// Teams without a finished match get an all-zero row.
pub fn aggregate_all(matches: &[Match], teams: &[TeamId]) -> Vec<(TeamId, StandingsRow)> {
    let mut rows: Vec<(TeamId, StandingsRow)> = teams
        .iter()
        .map(|&team| (team, StandingsRow::default()))
        .collect();
    for m in matches.iter().filter(|m| m.is_played()) {
        for (team, row) in rows.iter_mut() {
            if m.involves(*team) {
                row.record(m, *team);
            }
        }
    }
    rows
}

/// Teams appearing in `matches`, in order of first appearance (home side first).
pub fn teams_in(matches: &[Match]) -> Vec<TeamId> {
    let mut teams = Vec::new();
    for m in matches {
        for team in [m.home_team_id, m.away_team_id] {
            if !teams.contains(&team) {
                teams.push(team);
            }
        }
    }
    teams
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn played(home: TeamId, away: TeamId, home_goals: i32, away_goals: i32) -> Match {
        Match {
            id: None,
            season_id: 1,
            date: None,
            date_is_guess: false,
            home_team_id: home,
            away_team_id: away,
            home_goals: Some(home_goals),
            away_goals: Some(away_goals),
            home_bonus_points: 0,
            away_bonus_points: 0,
            what_if: false,
            real_home_goals: None,
            real_away_goals: None,
        }
    }

    pub(crate) fn on(mut m: Match, y: i32, mo: u32, d: u32) -> Match {
        m.date = NaiveDate::from_ymd_opt(y, mo, d);
        m
    }

    fn scheduled(home: TeamId, away: TeamId) -> Match {
        Match {
            home_goals: None,
            away_goals: None,
            ..played(home, away, 0, 0)
        }
    }

    #[test]
    fn home_and_away_are_counted_separately() {
        let matches = vec![
            played(1, 2, 2, 0),
            played(3, 1, 1, 1),
            played(1, 3, 0, 1),
            played(2, 1, 0, 4),
        ];
        let row = aggregate(&matches, 1);

        assert_eq!(row.home_wins, 1);
        assert_eq!(row.home_losses, 1);
        assert_eq!(row.home_for, 2);
        assert_eq!(row.home_against, 1);
        assert_eq!(row.away_wins, 1);
        assert_eq!(row.away_draws, 1);
        assert_eq!(row.away_for, 5);
        assert_eq!(row.away_against, 1);
        assert_eq!(row.played(), 4);
        assert_eq!(row.goal_difference(), 5);
    }

    #[test]
    fn home_and_away_totals_match_match_counts() {
        let matches = vec![
            played(1, 2, 3, 1),
            played(2, 3, 2, 2),
            played(3, 1, 0, 2),
            played(1, 3, 1, 1),
            played(2, 1, 1, 0),
            played(3, 2, 4, 0),
        ];
        for team in 1..=3 {
            let row = aggregate(&matches, team);
            let home = matches.iter().filter(|m| m.home_team_id == team).count() as u32;
            let away = matches.iter().filter(|m| m.away_team_id == team).count() as u32;
            assert_eq!(row.home_played(), home);
            assert_eq!(row.away_played(), away);
        }
    }

    #[test]
    fn scheduled_fixtures_are_ignored() {
        let matches = vec![played(1, 2, 1, 0), scheduled(2, 1)];
        let row = aggregate(&matches, 2);
        assert_eq!(row.played(), 1);
        assert_eq!(row.away_losses, 1);
    }

    #[test]
    fn bonus_points_follow_the_side() {
        let mut m = played(1, 2, 2, 2);
        m.home_bonus_points = 1;
        m.away_bonus_points = -2;
        assert_eq!(aggregate([&m], 1).bonus_points, 1);
        assert_eq!(aggregate([&m], 2).bonus_points, -2);
    }

    #[test]
    fn team_without_matches_is_all_zero() {
        let matches = vec![played(1, 2, 1, 0)];
        let rows = aggregate_all(&matches, &[1, 2, 9]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], (9, StandingsRow::default()));
        assert_eq!(rows[2].1.ratio(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn aggregate_all_keeps_team_order() {
        let matches = vec![played(5, 7, 0, 3)];
        let rows = aggregate_all(&matches, &[7, 5]);
        assert_eq!(rows[0].0, 7);
        assert_eq!(rows[0].1.away_wins, 1);
        assert_eq!(rows[1].1.home_losses, 1);
    }

    #[test]
    fn teams_in_uses_first_appearance() {
        let matches = vec![played(4, 2, 0, 0), played(2, 9, 1, 0), played(9, 4, 1, 2)];
        assert_eq!(teams_in(&matches), vec![4, 2, 9]);
    }
}
