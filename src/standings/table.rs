//! One table page: ranked rows with everything the viewer draws beside them.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::aggregate::{aggregate, aggregate_all, check_scores, teams_in, StandingsRow};
use super::history::{on_or_before, recent_form, recent_matches, Form};
use super::projection::{project, ProjectionInterval};
use super::rank_range::{estimate_rank_ranges, Contender, RankRange};
use super::sort_key::{legacy, rank, RankedRow};
use super::thresholds::{estimate_thresholds, zone, Thresholds, Zone};
use super::Result;
use crate::db::models::{Match, Season, TeamId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableEntry {
    #[serde(flatten)]
    pub ranked: RankedRow,
    pub zone: Zone,
    /// `None` on tables that are not tied to a season in progress
    pub projection: Option<ProjectionInterval>,
    pub rank_range: Option<RankRange>,
    /// Points with goal difference packed into the fraction, as older
    /// exports printed it
    pub sort_value: Option<f64>,
    pub form: Form,
}

impl TableEntry {
    fn plain(ranked: RankedRow) -> Self {
        Self {
            ranked,
            zone: Zone::Neutral,
            projection: None,
            rank_range: None,
            sort_value: None,
            form: Form::default(),
        }
    }

    pub fn team_id(&self) -> TeamId {
        self.ranked.team_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueTable {
    pub season_id: Option<i64>,
    pub as_of: Option<NaiveDate>,
    pub entries: Vec<TableEntry>,
    pub thresholds: Thresholds,
    /// Lowest current points, the left edge of the projection bars
    pub scale_min: i32,
    /// Highest reachable points, the right edge of the projection bars
    pub scale_max: i32,
    /// Some team still has matches to play
    pub show_projection: bool,
}

impl LeagueTable {
    /// Season table as it stood on `as_of` (the final table when `None`).
    ///
    /// `teams` lists the teams to show; when empty every team appearing in
    /// `matches` is used, so teams with only scheduled fixtures still get a
    /// row. `last_results` is the form length, `0` for none.
    pub fn build(
        season: &Season,
        matches: &[Match],
        teams: &[TeamId],
        as_of: Option<NaiveDate>,
        last_results: usize,
    ) -> Result<Self> {
        let as_of = season.cut_off(as_of);
        let teams = if teams.is_empty() {
            teams_in(matches)
        } else {
            teams.to_vec()
        };
        let counted: Vec<Match> = matches
            .iter()
            .filter(|m| m.season_id == season.id && on_or_before(m, as_of))
            .cloned()
            .collect();
        check_scores(&counted)?;

        let ranked = rank(aggregate_all(&counted, &teams));
        let thresholds = estimate_thresholds(&ranked, season);

        let mut projections = Vec::with_capacity(ranked.len());
        let mut contenders = Vec::with_capacity(ranked.len());
        let mut sort_values = Vec::with_capacity(ranked.len());
        for r in &ranked {
            sort_values.push(legacy::encode(r.points, r.goal_difference)?);
            let projection = project(r.team_id, &r.row, season)?;
            contenders.push(Contender::new(
                r.team_id,
                &projection,
                r.points,
                r.goal_difference,
                season.num_matches,
            ));
            projections.push(projection);
        }
        let rank_ranges = estimate_rank_ranges(&contenders);

        let scale_min = contenders.iter().map(|c| c.min_points).min().unwrap_or(0);
        let scale_max = contenders.iter().map(|c| c.max_points).max().unwrap_or(0);
        let show_projection = contenders.iter().any(|c| c.remaining > 0);

        let entries: Vec<TableEntry> = ranked
            .into_iter()
            .zip(projections)
            .zip(rank_ranges)
            .zip(sort_values)
            .map(|(((ranked, projection), rank_range), sort_value)| {
                let form = if last_results > 0 {
                    recent_form(&counted, ranked.team_id, as_of, last_results)
                } else {
                    Form::default()
                };
                TableEntry {
                    zone: zone(ranked.position, season),
                    projection: Some(projection),
                    rank_range: Some(rank_range),
                    sort_value: Some(sort_value),
                    form,
                    ranked,
                }
            })
            .collect();

        debug!(
            season_id = season.id,
            teams = entries.len(),
            safe_points = thresholds.safe_points,
            required_points = thresholds.required_points,
            "built league table"
        );

        Ok(Self {
            season_id: Some(season.id),
            as_of,
            entries,
            thresholds,
            scale_min,
            scale_max,
            show_projection,
        })
    }

    /// Table over the finished matches between two dates, across seasons.
    /// Bonus points belong to a season and are left out.
    pub fn between(matches: &[Match], start: Option<NaiveDate>, finish: Option<NaiveDate>) -> Self {
        let counted: Vec<Match> = matches
            .iter()
            .filter(|m| on_or_after(m, start) && on_or_before(m, finish))
            .cloned()
            .collect();
        let teams = teams_in(&counted);
        Self::plain(None, finish, without_bonus(aggregate_all(&counted, &teams)))
    }

    /// Mini-league of `members`: only matches where both sides are members.
    pub fn subset(
        matches: &[Match],
        members: &[TeamId],
        start: Option<NaiveDate>,
        finish: Option<NaiveDate>,
    ) -> Self {
        let inside: Vec<Match> = matches
            .iter()
            .filter(|m| members.contains(&m.home_team_id) && members.contains(&m.away_team_id))
            .cloned()
            .collect();
        let mut table = Self::between(&inside, start, finish);
        // members without a result yet still get a row
        for &team in members {
            if table.entry(team).is_some() {
                continue;
            }
            let position = table.entries.len() + 1;
            for mut ranked in rank(vec![(team, StandingsRow::default())]) {
                ranked.position = position;
                table.entries.push(TableEntry::plain(ranked));
            }
        }
        table
    }

    /// Each team over only its `n` most recent results up to `as_of`.
    pub fn last_results(season: &Season, matches: &[Match], as_of: Option<NaiveDate>, n: usize) -> Self {
        let as_of = season.cut_off(as_of);
        let owned: Vec<Match> = matches
            .iter()
            .filter(|m| m.season_id == season.id)
            .cloned()
            .collect();

        let rows = teams_in(&owned)
            .into_iter()
            .map(|team| {
                let recent = recent_matches(&owned, team, as_of, n);
                (team, aggregate(recent, team))
            })
            .collect();

        let mut table = Self::plain(Some(season.id), as_of, rows);
        for entry in &mut table.entries {
            entry.zone = zone(entry.ranked.position, season);
            entry.form = recent_form(&owned, entry.team_id(), as_of, n);
        }
        table
    }

    fn plain(season_id: Option<i64>, as_of: Option<NaiveDate>, rows: Vec<(TeamId, StandingsRow)>) -> Self {
        let entries: Vec<TableEntry> = rank(rows).into_iter().map(TableEntry::plain).collect();
        let scale_min = entries.iter().map(|e| e.ranked.points).min().unwrap_or(0);
        let scale_max = entries.iter().map(|e| e.ranked.points).max().unwrap_or(0);
        debug!(teams = entries.len(), "built table without projections");
        Self {
            season_id,
            as_of,
            entries,
            thresholds: Thresholds::default(),
            scale_min,
            scale_max,
            show_projection: false,
        }
    }

    pub fn entry(&self, team: TeamId) -> Option<&TableEntry> {
        self.entries.iter().find(|e| e.team_id() == team)
    }
}

fn on_or_after(m: &Match, start: Option<NaiveDate>) -> bool {
    match start {
        Some(start) => m.date.is_some_and(|date| date >= start),
        None => true,
    }
}

fn without_bonus(rows: Vec<(TeamId, StandingsRow)>) -> Vec<(TeamId, StandingsRow)> {
    rows.into_iter()
        .map(|(team, row)| (team, StandingsRow { bonus_points: 0, ..row }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Outcome;
    use crate::standings::aggregate::tests::{on, played};
    use crate::standings::projection::tests::season;
    use crate::standings::StandingsError;

    fn scheduled(home: TeamId, away: TeamId) -> Match {
        Match {
            home_goals: None,
            away_goals: None,
            ..played(home, away, 0, 0)
        }
    }

    /// A: 2 wins (+3), B: win and draw (+1), C: 2 losses. A and B took
    /// their second result off team 4, which is not part of the table.
    fn three_team_matches() -> Vec<Match> {
        vec![
            on(played(1, 3, 2, 0), 2024, 9, 1),
            on(played(2, 3, 2, 1), 2024, 9, 1),
            on(played(1, 4, 1, 0), 2024, 9, 8),
            on(played(2, 4, 0, 0), 2024, 9, 8),
            scheduled(3, 1),
            scheduled(3, 2),
        ]
    }

    #[test]
    fn scenario_table_and_rank_ranges() {
        let matches = three_team_matches();
        let table = LeagueTable::build(&season(4), &matches, &[1, 2, 3], None, 0).unwrap();

        let order: Vec<TeamId> = table.entries.iter().map(|e| e.team_id()).collect();
        assert_eq!(order, vec![1, 2, 3]);

        let a = table.entry(1).unwrap();
        assert_eq!(a.ranked.points, 6);
        assert_eq!(a.ranked.goal_difference, 3);
        assert_eq!(a.rank_range, Some(RankRange { best: 1, worst: 2 }));
        approx::assert_relative_eq!(a.sort_value.unwrap(), 6.003);

        let c = table.entry(3).unwrap();
        assert_eq!(c.projection.unwrap().max_points, 6);
        assert!(c.rank_range.unwrap().best <= 3);

        assert!(table.show_projection);
        assert_eq!(table.scale_min, 0);
        assert_eq!(table.scale_max, 12);
    }

    #[test]
    fn unplayed_teams_get_a_row() {
        let matches = vec![scheduled(1, 2), scheduled(2, 1)];
        let table = LeagueTable::build(&season(2), &matches, &[], None, 5).unwrap();
        assert_eq!(table.entries.len(), 2);
        for entry in &table.entries {
            assert_eq!(entry.projection, Some(ProjectionInterval::default()));
            assert_eq!(entry.ranked.points, 0);
            assert!(entry.form.results.is_empty());
        }
        assert_eq!(table.thresholds, Thresholds::default());
    }

    #[test]
    fn cut_off_date_hides_later_results() {
        let matches = three_team_matches();
        let as_of = NaiveDate::from_ymd_opt(2024, 9, 5);
        let table = LeagueTable::build(&season(4), &matches, &[1, 2, 3], as_of, 5).unwrap();
        assert_eq!(table.as_of, as_of);
        assert_eq!(table.entry(1).unwrap().ranked.played(), 1);
        assert_eq!(table.entry(1).unwrap().form.results, vec![Outcome::Win]);
    }

    #[test]
    fn date_past_the_season_is_the_final_table() {
        let matches = three_team_matches();
        let table =
            LeagueTable::build(&season(4), &matches, &[], NaiveDate::from_ymd_opt(2030, 1, 1), 0)
                .unwrap();
        assert_eq!(table.as_of, None);
        assert_eq!(table.entry(1).unwrap().ranked.played(), 2);
    }

    #[test]
    fn too_many_results_fail_the_render() {
        let matches = three_team_matches();
        let err = LeagueTable::build(&season(1), &matches, &[1, 2, 3], None, 0).unwrap_err();
        assert!(matches!(err, StandingsError::PlayedExceedsSeason { played: 2, .. }));
    }

    #[test]
    fn goal_difference_beyond_the_sort_value_fails_the_render() {
        let matches = vec![played(1, 3, 500, 0)];
        let err = LeagueTable::build(&season(4), &matches, &[], None, 0).unwrap_err();
        assert_eq!(err, StandingsError::GoalDifferenceOutOfRange { goal_difference: 500 });
        assert!(LeagueTable::between(&matches, None, None).entries[0].sort_value.is_none());
    }

    #[test]
    fn negative_score_fails_the_render() {
        let matches = vec![Match {
            id: Some(7),
            ..played(1, 2, -1, 0)
        }];
        let err = LeagueTable::build(&season(4), &matches, &[], None, 0).unwrap_err();
        assert_eq!(err, StandingsError::NegativeScore { match_id: 7 });
    }

    #[test]
    fn zones_and_thresholds_are_attached() {
        let s = Season {
            qualification_pos: Some(1),
            relegation_pos: Some(2),
            ..season(4)
        };
        let table = LeagueTable::build(&s, &three_team_matches(), &[1, 2, 3], None, 0).unwrap();
        let zones: Vec<Zone> = table.entries.iter().map(|e| e.zone).collect();
        assert_eq!(zones, vec![Zone::Qualification, Zone::Neutral, Zone::Relegation]);
        // required: A on pace for 12, B for 8 -> 10
        assert_eq!(table.thresholds.required_points, 10);
        // safe: B 8, C 0 -> 4
        assert_eq!(table.thresholds.safe_points, 4);
    }

    #[test]
    fn finished_season_hides_projection() {
        let matches = vec![played(1, 2, 1, 0), played(2, 1, 1, 1)];
        let table = LeagueTable::build(&season(2), &matches, &[], None, 0).unwrap();
        assert!(!table.show_projection);
        assert!(table.entries.iter().all(|e| e.rank_range.unwrap().is_settled()));
    }

    #[test]
    fn date_range_table_drops_bonus_points() {
        let mut matches = three_team_matches();
        matches[0].home_bonus_points = 5;
        let table = LeagueTable::between(&matches, None, None);
        assert_eq!(table.entry(1).unwrap().ranked.points, 6);
        assert!(table.entry(1).unwrap().projection.is_none());
        assert!(!table.show_projection);
        assert_eq!(table.season_id, None);
    }

    #[test]
    fn date_range_table_respects_bounds() {
        let matches = three_team_matches();
        let day = NaiveDate::from_ymd_opt(2024, 9, 8);
        let table = LeagueTable::between(&matches, day, day);
        assert_eq!(table.entry(1).unwrap().ranked.played(), 1);
        assert!(table.entry(3).is_none());
    }

    #[test]
    fn subset_table_only_counts_matches_between_members() {
        let matches = three_team_matches();
        let table = LeagueTable::subset(&matches, &[1, 3, 2], None, None);
        // 1 beat 3 and 2 beat 3; the games against team 4 are outside
        assert_eq!(table.entry(1).unwrap().ranked.played(), 1);
        assert_eq!(table.entry(2).unwrap().ranked.played(), 1);
        assert_eq!(table.entry(3).unwrap().ranked.played(), 2);
        assert!(table.entry(4).is_none());
    }

    #[test]
    fn subset_keeps_members_without_results() {
        let matches = three_team_matches();
        let table = LeagueTable::subset(&matches, &[1, 9], None, None);
        let order: Vec<(TeamId, usize)> = table
            .entries
            .iter()
            .map(|e| (e.team_id(), e.ranked.position))
            .collect();
        assert_eq!(order, vec![(1, 1), (9, 2)]);
        assert!(table.entries.iter().all(|e| e.ranked.played() == 0));
    }

    #[test]
    fn last_results_table_uses_recent_matches_only() {
        let matches = three_team_matches();
        let table = LeagueTable::last_results(&season(4), &matches, None, 1);
        // each team's latest result: 1 beat 4, 2 drew 4, 3 lost to 2, 4 drew 2
        assert_eq!(table.entry(1).unwrap().ranked.points, 3);
        assert_eq!(table.entry(2).unwrap().ranked.points, 1);
        assert_eq!(table.entry(3).unwrap().ranked.points, 0);
        assert_eq!(table.entry(1).unwrap().form.results, vec![Outcome::Win]);
        assert!(table.entries.iter().all(|e| e.ranked.played() <= 1));
    }
}
