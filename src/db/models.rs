use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store identifier of a team.
pub type TeamId = i64;

/// A team (row of the TEAMS table)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub comments: Option<String>,
    /// Member of the user-selected subset used by the mini-league table
    pub sub_group: bool,
}

/// Table positions a season may configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Last position that qualifies for the top prize (promotion, title, ...)
    Qualification,
    /// Last position of the lesser qualification places
    SecondaryQualification,
    /// Last safe position before relegation / elimination
    Relegation,
}

/// A season (row of the SEASONS table)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub finish_date: NaiveDate,
    pub comments: Option<String>,
    /// Matches each team plays over the full season
    pub num_matches: u32,
    /// 1-based position, `None` when not configured
    pub qualification_pos: Option<usize>,
    pub secondary_qualification_pos: Option<usize>,
    pub relegation_pos: Option<usize>,
}

impl Season {
    /// The configured 1-based table position for `kind`.
    pub fn boundary(&self, kind: Boundary) -> Option<usize> {
        match kind {
            Boundary::Qualification => self.qualification_pos,
            Boundary::SecondaryQualification => self.secondary_qualification_pos,
            Boundary::Relegation => self.relegation_pos,
        }
    }

    /// Clamp a requested cut-off date into the season. Dates past the finish
    /// date mean "the final table" and collapse to `None`.
    pub fn cut_off(&self, date: Option<NaiveDate>) -> Option<NaiveDate> {
        date.filter(|d| *d <= self.finish_date)
    }
}

/// A finished or scheduled match (row of the MATCHES table)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Option<i64>,
    pub season_id: i64,
    pub date: Option<NaiveDate>,
    /// The date is an estimate rather than a known fixture date
    pub date_is_guess: bool,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    /// `None` until the match has been played
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub home_bonus_points: i32,
    pub away_bonus_points: i32,
    /// A what-if score has replaced the real one
    pub what_if: bool,
    /// Real score, kept while a what-if score is applied
    pub real_home_goals: Option<i32>,
    pub real_away_goals: Option<i32>,
}

/// Result of a match from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// League points for this result, bonus excluded.
    pub fn points(self) -> i32 {
        match self {
            Outcome::Win => 3,
            Outcome::Draw => 1,
            Outcome::Loss => 0,
        }
    }

    fn from_goals(scored: i32, conceded: i32) -> Self {
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        }
    }
}

impl Match {
    /// Final (or what-if) score, `None` for a scheduled fixture.
    pub fn score(&self) -> Option<(i32, i32)> {
        Some((self.home_goals?, self.away_goals?))
    }

    pub fn is_played(&self) -> bool {
        self.score().is_some()
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.home_team_id == team || self.away_team_id == team
    }

    /// Goals scored and conceded by `team`, if it played in this match.
    pub fn goals_for(&self, team: TeamId) -> Option<(i32, i32)> {
        let (home, away) = self.score()?;
        if self.home_team_id == team {
            Some((home, away))
        } else if self.away_team_id == team {
            Some((away, home))
        } else {
            None
        }
    }

    pub fn outcome_for(&self, team: TeamId) -> Option<Outcome> {
        self.goals_for(team)
            .map(|(scored, conceded)| Outcome::from_goals(scored, conceded))
    }

    pub fn bonus_points_for(&self, team: TeamId) -> i32 {
        if self.home_team_id == team {
            self.home_bonus_points
        } else if self.away_team_id == team {
            self.away_bonus_points
        } else {
            0
        }
    }

    /// The real score behind a what-if override; the shown score otherwise.
    pub fn real_score(&self) -> Option<(i32, i32)> {
        if self.what_if {
            Some((self.real_home_goals?, self.real_away_goals?))
        } else {
            self.score()
        }
    }
}
