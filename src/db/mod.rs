use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

mod cache;
pub mod models;

pub use cache::RequestCache;
use models::*;

/// Thread-safe SQLite connection pool (single connection with mutex)
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the SQLite database at the given path
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Self::with_connection(conn)
    }

    /// Private in-memory database
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let db = Database {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database connection mutex poisoned"))
    }

    /// Run schema migrations (idempotent)
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    // ── Teams ────────────────────────────────────────────────────────────────

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn insert_team(&self, team: &Team) -> Result<TeamId> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO TEAMS (LABEL, COMMENTS, SUB_GROUP) VALUES (?1, ?2, ?3)",
            params![team.name, team.comments, team.sub_group],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_team(&self, id: TeamId) -> Result<Option<Team>> {
        let conn = self.conn()?;
        let team = conn
            .query_row(
                "SELECT ID, LABEL, COMMENTS, SUB_GROUP FROM TEAMS WHERE ID = ?1",
                params![id],
                map_team,
            )
            .optional()?;
        Ok(team)
    }

    /// All teams by name
    pub fn list_teams(&self) -> Result<Vec<Team>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT ID, LABEL, COMMENTS, SUB_GROUP FROM TEAMS ORDER BY LABEL")?;
        let teams = stmt
            .query_map([], map_team)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(teams)
    }

    /// Add or remove a team from the mini-league subset. Returns false for
    /// an unknown team.
    pub fn set_sub_group(&self, team_id: TeamId, included: bool) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE TEAMS SET SUB_GROUP = ?1 WHERE ID = ?2",
            params![included, team_id],
        )?;
        Ok(changed > 0)
    }

    /// Members of the mini-league subset, by name
    pub fn sub_group_teams(&self) -> Result<Vec<Team>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT ID, LABEL, COMMENTS, SUB_GROUP FROM TEAMS WHERE SUB_GROUP = 1 ORDER BY LABEL",
        )?;
        let teams = stmt
            .query_map([], map_team)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(teams)
    }

    // ── Seasons ──────────────────────────────────────────────────────────────

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn insert_season(&self, season: &Season) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO SEASONS (
                LABEL, START_DATE, FINISH_DATE, COMMENTS, NUM_MATCHES,
                GOOD_POS, POSITIVE_POS, BAD_POS
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![
                season.name,
                season.start_date,
                season.finish_date,
                season.comments,
                season.num_matches,
                season.qualification_pos.map(|p| p as i64),
                season.secondary_qualification_pos.map(|p| p as i64),
                season.relegation_pos.map(|p| p as i64),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_season(&self, id: i64) -> Result<Option<Season>> {
        let conn = self.conn()?;
        let season = conn
            .query_row(
                &format!("{SEASON_COLUMNS} WHERE ID = ?1"),
                params![id],
                map_season,
            )
            .optional()?;
        Ok(season)
    }

    /// All seasons, most recent first
    pub fn list_seasons(&self) -> Result<Vec<Season>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{SEASON_COLUMNS} ORDER BY START_DATE DESC"))?;
        let seasons = stmt
            .query_map([], map_season)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(seasons)
    }

    /// The season that started most recently
    pub fn latest_season(&self) -> Result<Option<Season>> {
        let conn = self.conn()?;
        let season = conn
            .query_row(
                &format!("{SEASON_COLUMNS} ORDER BY START_DATE DESC LIMIT 1"),
                [],
                map_season,
            )
            .optional()?;
        Ok(season)
    }

    /// Seasons either side of `season` by start date: (previous, next)
    pub fn adjacent_seasons(&self, season: &Season) -> Result<(Option<Season>, Option<Season>)> {
        let conn = self.conn()?;
        let previous = conn
            .query_row(
                &format!("{SEASON_COLUMNS} WHERE START_DATE < ?1 ORDER BY START_DATE DESC LIMIT 1"),
                params![season.start_date],
                map_season,
            )
            .optional()?;
        let next = conn
            .query_row(
                &format!("{SEASON_COLUMNS} WHERE START_DATE > ?1 ORDER BY START_DATE LIMIT 1"),
                params![season.start_date],
                map_season,
            )
            .optional()?;
        Ok((previous, next))
    }

    // ── Matches ──────────────────────────────────────────────────────────────

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn insert_match(&self, m: &Match) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO MATCHES (
                SEASON_ID, THE_DATE, THE_DATE_GUESS, HOME_TEAM_ID, AWAY_TEAM_ID,
                HOME_TEAM_FOR, AWAY_TEAM_FOR, HOME_BONUS_PTS, AWAY_BONUS_PTS,
                WHAT_IF, REAL_HOME_TEAM_FOR, REAL_AWAY_TEAM_FOR
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
            params![
                m.season_id,
                m.date,
                m.date_is_guess,
                m.home_team_id,
                m.away_team_id,
                m.home_goals,
                m.away_goals,
                m.home_bonus_points,
                m.away_bonus_points,
                m.what_if,
                m.real_home_goals,
                m.real_away_goals,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_match(&self, id: i64) -> Result<Option<Match>> {
        let conn = self.conn()?;
        let m = conn
            .query_row(&format!("{MATCH_COLUMNS} WHERE ID = ?1"), params![id], map_match)
            .optional()?;
        Ok(m)
    }

    /// Finished and scheduled matches of a season in date order, cut at
    /// `up_to` when given. Undated fixtures come last and are dropped by a cut.
    pub fn season_matches(&self, season_id: i64, up_to: Option<NaiveDate>) -> Result<Vec<Match>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{MATCH_COLUMNS} WHERE SEASON_ID = ?1 AND (?2 IS NULL OR THE_DATE <= ?2)
             ORDER BY THE_DATE IS NULL, THE_DATE, ID"
        ))?;
        let matches = stmt
            .query_map(params![season_id, up_to], map_match)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(matches)
    }

    /// Matches dated within `[start, finish]` across all seasons. Either end
    /// may be open.
    pub fn matches_between(
        &self,
        start: Option<NaiveDate>,
        finish: Option<NaiveDate>,
    ) -> Result<Vec<Match>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{MATCH_COLUMNS} WHERE THE_DATE IS NOT NULL
               AND (?1 IS NULL OR THE_DATE >= ?1)
               AND (?2 IS NULL OR THE_DATE <= ?2)
             ORDER BY THE_DATE, ID"
        ))?;
        let matches = stmt
            .query_map(params![start, finish], map_match)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(matches)
    }

    /// Latest finished matches of a season on or before `up_to`, newest first
    pub fn recent_results(
        &self,
        season_id: i64,
        up_to: Option<NaiveDate>,
        limit: u32,
    ) -> Result<Vec<Match>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{MATCH_COLUMNS} WHERE SEASON_ID = ?1 AND HOME_TEAM_FOR IS NOT NULL
               AND (?2 IS NULL OR THE_DATE <= ?2)
             ORDER BY THE_DATE DESC, ID DESC LIMIT ?3"
        ))?;
        let matches = stmt
            .query_map(params![season_id, up_to, limit], map_match)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(matches)
    }

    /// Fixtures after `after`, or every unplayed fixture when no date is
    /// given, soonest first
    pub fn upcoming_matches(
        &self,
        season_id: i64,
        after: Option<NaiveDate>,
        limit: u32,
    ) -> Result<Vec<Match>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{MATCH_COLUMNS} WHERE SEASON_ID = ?1
               AND ((?2 IS NULL AND HOME_TEAM_FOR IS NULL) OR THE_DATE > ?2)
             ORDER BY THE_DATE IS NULL, THE_DATE, ID LIMIT ?3"
        ))?;
        let matches = stmt
            .query_map(params![season_id, after, limit], map_match)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(matches)
    }

    // ── What-if scores ───────────────────────────────────────────────────────

    /// Replace a score, keeping the real one for [`Database::restore_what_if`].
    /// Overriding an override keeps the first real score. Returns false for
    /// an unknown match.
    pub fn set_what_if_score(&self, match_id: i64, home_goals: i32, away_goals: i32) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE MATCHES SET
                REAL_HOME_TEAM_FOR = CASE WHEN WHAT_IF = 1 THEN REAL_HOME_TEAM_FOR ELSE HOME_TEAM_FOR END,
                REAL_AWAY_TEAM_FOR = CASE WHEN WHAT_IF = 1 THEN REAL_AWAY_TEAM_FOR ELSE AWAY_TEAM_FOR END,
                HOME_TEAM_FOR = ?1,
                AWAY_TEAM_FOR = ?2,
                WHAT_IF = 1
             WHERE ID = ?3",
            params![home_goals, away_goals, match_id],
        )?;
        Ok(changed > 0)
    }

    /// Put every overridden score back. Returns the number of matches reset.
    pub fn restore_what_if(&self) -> Result<usize> {
        let conn = self.conn()?;
        let restored = conn.execute(
            "UPDATE MATCHES SET
                HOME_TEAM_FOR = REAL_HOME_TEAM_FOR,
                AWAY_TEAM_FOR = REAL_AWAY_TEAM_FOR,
                REAL_HOME_TEAM_FOR = NULL,
                REAL_AWAY_TEAM_FOR = NULL,
                WHAT_IF = 0
             WHERE WHAT_IF = 1",
            [],
        )?;
        Ok(restored)
    }
}

// ── SQL helpers ────────────────────────────────────────────────────────────────

const SEASON_COLUMNS: &str = "SELECT ID, LABEL, START_DATE, FINISH_DATE, COMMENTS, NUM_MATCHES,
        GOOD_POS, POSITIVE_POS, BAD_POS FROM SEASONS";

const MATCH_COLUMNS: &str = "SELECT ID, SEASON_ID, THE_DATE, THE_DATE_GUESS, HOME_TEAM_ID,
        AWAY_TEAM_ID, HOME_TEAM_FOR, AWAY_TEAM_FOR, HOME_BONUS_PTS, AWAY_BONUS_PTS,
        WHAT_IF, REAL_HOME_TEAM_FOR, REAL_AWAY_TEAM_FOR FROM MATCHES";

fn map_team(row: &rusqlite::Row) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        comments: row.get(2)?,
        sub_group: row.get(3)?,
    })
}

/// Positions stored as NULL or 0 are not configured.
fn boundary_position(value: Option<i64>) -> Option<usize> {
    value.filter(|p| *p > 0).map(|p| p as usize)
}

fn map_season(row: &rusqlite::Row) -> rusqlite::Result<Season> {
    Ok(Season {
        id: row.get(0)?,
        name: row.get(1)?,
        start_date: row.get(2)?,
        finish_date: row.get(3)?,
        comments: row.get(4)?,
        num_matches: row.get(5)?,
        qualification_pos: boundary_position(row.get(6)?),
        secondary_qualification_pos: boundary_position(row.get(7)?),
        relegation_pos: boundary_position(row.get(8)?),
    })
}

fn map_match(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        season_id: row.get(1)?,
        date: row.get(2)?,
        date_is_guess: row.get(3)?,
        home_team_id: row.get(4)?,
        away_team_id: row.get(5)?,
        home_goals: row.get(6)?,
        away_goals: row.get(7)?,
        home_bonus_points: row.get(8)?,
        away_bonus_points: row.get(9)?,
        what_if: row.get(10)?,
        real_home_goals: row.get(11)?,
        real_away_goals: row.get(12)?,
    })
}

/// SQLite schema (idempotent CREATE IF NOT EXISTS)
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS TEAMS (
    ID          INTEGER PRIMARY KEY AUTOINCREMENT,
    LABEL       TEXT    NOT NULL,
    COMMENTS    TEXT,
    SUB_GROUP   INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS SEASONS (
    ID           INTEGER PRIMARY KEY AUTOINCREMENT,
    LABEL        TEXT    NOT NULL,
    START_DATE   TEXT    NOT NULL,
    FINISH_DATE  TEXT    NOT NULL,
    COMMENTS     TEXT,
    NUM_MATCHES  INTEGER NOT NULL DEFAULT 0,
    GOOD_POS     INTEGER,
    POSITIVE_POS INTEGER,
    BAD_POS      INTEGER
);

CREATE TABLE IF NOT EXISTS MATCHES (
    ID                 INTEGER PRIMARY KEY AUTOINCREMENT,
    SEASON_ID          INTEGER NOT NULL,
    THE_DATE           TEXT,
    THE_DATE_GUESS     INTEGER NOT NULL DEFAULT 0,
    HOME_TEAM_ID       INTEGER NOT NULL,
    AWAY_TEAM_ID       INTEGER NOT NULL,
    HOME_TEAM_FOR      INTEGER CHECK (HOME_TEAM_FOR >= 0),
    AWAY_TEAM_FOR      INTEGER CHECK (AWAY_TEAM_FOR >= 0),
    HOME_BONUS_PTS     INTEGER NOT NULL DEFAULT 0,
    AWAY_BONUS_PTS     INTEGER NOT NULL DEFAULT 0,
    WHAT_IF            INTEGER NOT NULL DEFAULT 0,
    REAL_HOME_TEAM_FOR INTEGER CHECK (REAL_HOME_TEAM_FOR >= 0),
    REAL_AWAY_TEAM_FOR INTEGER CHECK (REAL_AWAY_TEAM_FOR >= 0),
    FOREIGN KEY (SEASON_ID) REFERENCES SEASONS(ID),
    FOREIGN KEY (HOME_TEAM_ID) REFERENCES TEAMS(ID),
    FOREIGN KEY (AWAY_TEAM_ID) REFERENCES TEAMS(ID)
);

CREATE INDEX IF NOT EXISTS idx_matches_season ON MATCHES(SEASON_ID, THE_DATE);
CREATE INDEX IF NOT EXISTS idx_matches_date ON MATCHES(THE_DATE);
CREATE INDEX IF NOT EXISTS idx_matches_home ON MATCHES(HOME_TEAM_ID);
CREATE INDEX IF NOT EXISTS idx_matches_away ON MATCHES(AWAY_TEAM_ID);
"#;

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn team(name: &str) -> Team {
        Team {
            id: 0,
            name: name.into(),
            comments: None,
            sub_group: false,
        }
    }

    pub(crate) fn season(name: &str, start: NaiveDate, finish: NaiveDate) -> Season {
        Season {
            id: 0,
            name: name.into(),
            start_date: start,
            finish_date: finish,
            comments: None,
            num_matches: 4,
            qualification_pos: Some(1),
            secondary_qualification_pos: None,
            relegation_pos: Some(2),
        }
    }

    pub(crate) fn fixture(
        season_id: i64,
        on: Option<NaiveDate>,
        home: TeamId,
        away: TeamId,
        score: Option<(i32, i32)>,
    ) -> Match {
        Match {
            season_id,
            date: on,
            home_team_id: home,
            away_team_id: away,
            home_goals: score.map(|s| s.0),
            away_goals: score.map(|s| s.1),
            ..Default::default()
        }
    }

    /// Three teams, one season: two results in September, one undated fixture.
    pub(crate) fn seeded() -> (Database, i64, Vec<TeamId>) {
        let db = Database::open_in_memory().unwrap();
        let teams: Vec<TeamId> = ["Ashby", "Burton", "Coalville"]
            .iter()
            .map(|name| db.insert_team(&team(name)).unwrap())
            .collect();
        let season_id = db
            .insert_season(&season("2024-25", date(2024, 8, 1), date(2025, 5, 31)))
            .unwrap();
        db.insert_match(&fixture(season_id, Some(date(2024, 9, 1)), teams[0], teams[1], Some((2, 0))))
            .unwrap();
        db.insert_match(&fixture(season_id, Some(date(2024, 9, 8)), teams[2], teams[0], Some((1, 1))))
            .unwrap();
        db.insert_match(&fixture(season_id, None, teams[1], teams[2], None))
            .unwrap();
        (db, season_id, teams)
    }

    #[test]
    fn migrations_are_idempotent() {
        let (db, _, _) = seeded();
        db.run_migrations().unwrap();
        assert_eq!(db.list_teams().unwrap().len(), 3);
    }

    #[test]
    fn team_round_trip() {
        let (db, _, teams) = seeded();
        let team = db.get_team(teams[1]).unwrap().unwrap();
        assert_eq!(team.name, "Burton");
        assert!(!team.sub_group);
        assert!(db.get_team(999).unwrap().is_none());
    }

    #[test]
    fn season_boundaries_read_back_as_options() {
        let (db, season_id, _) = seeded();
        let season = db.get_season(season_id).unwrap().unwrap();
        assert_eq!(season.num_matches, 4);
        assert_eq!(season.qualification_pos, Some(1));
        assert_eq!(season.secondary_qualification_pos, None);
        assert_eq!(season.relegation_pos, Some(2));
        assert_eq!(season.start_date, date(2024, 8, 1));
    }

    #[test]
    fn zero_boundary_means_not_configured() {
        let db = Database::open_in_memory().unwrap();
        let mut s = season("old", date(2000, 8, 1), date(2001, 5, 31));
        s.relegation_pos = Some(0);
        let id = db.insert_season(&s).unwrap();
        assert_eq!(db.get_season(id).unwrap().unwrap().relegation_pos, None);
    }

    #[test]
    fn seasons_are_ordered_by_start_date() {
        let (db, current, _) = seeded();
        let older = db
            .insert_season(&season("2023-24", date(2023, 8, 1), date(2024, 5, 31)))
            .unwrap();
        let names: Vec<String> = db.list_seasons().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["2024-25", "2023-24"]);
        assert_eq!(db.latest_season().unwrap().unwrap().id, current);

        let this = db.get_season(current).unwrap().unwrap();
        let (previous, next) = db.adjacent_seasons(&this).unwrap();
        assert_eq!(previous.map(|s| s.id), Some(older));
        assert!(next.is_none());
    }

    #[test]
    fn season_matches_keep_scheduled_fixtures() {
        let (db, season_id, teams) = seeded();
        let all = db.season_matches(season_id, None).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[0].is_played());
        assert!(!all[2].is_played());
        assert_eq!(all[2].home_team_id, teams[1]);

        let cut = db.season_matches(season_id, Some(date(2024, 9, 5))).unwrap();
        assert_eq!(cut.len(), 1);
    }

    #[test]
    fn date_range_spans_seasons() {
        let (db, _, teams) = seeded();
        let other = db
            .insert_season(&season("Cup", date(2024, 9, 1), date(2024, 12, 31)))
            .unwrap();
        db.insert_match(&fixture(other, Some(date(2024, 9, 4)), teams[1], teams[0], Some((0, 3))))
            .unwrap();
        let between = db
            .matches_between(Some(date(2024, 9, 1)), Some(date(2024, 9, 5)))
            .unwrap();
        assert_eq!(between.len(), 2);
        assert_eq!(db.matches_between(None, None).unwrap().len(), 3);
    }

    #[test]
    fn recent_and_upcoming_matches() {
        let (db, season_id, _) = seeded();
        let recent = db.recent_results(season_id, None, 20).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].date, Some(date(2024, 9, 8)));

        let upcoming = db.upcoming_matches(season_id, None, 5).unwrap();
        assert_eq!(upcoming.len(), 1);
        assert!(!upcoming[0].is_played());

        let after = db.upcoming_matches(season_id, Some(date(2024, 9, 2)), 5).unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].date, Some(date(2024, 9, 8)));
    }

    #[test]
    fn sub_group_membership() {
        let (db, _, teams) = seeded();
        assert!(db.set_sub_group(teams[2], true).unwrap());
        assert!(db.set_sub_group(teams[0], true).unwrap());
        assert!(!db.set_sub_group(999, true).unwrap());
        let names: Vec<String> = db.sub_group_teams().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Ashby", "Coalville"]);

        db.set_sub_group(teams[2], false).unwrap();
        assert_eq!(db.sub_group_teams().unwrap().len(), 1);
    }

    #[test]
    fn what_if_scores_restore_to_the_real_score() {
        let (db, season_id, _) = seeded();
        let first = db.season_matches(season_id, None).unwrap()[0].id.unwrap();

        assert!(db.set_what_if_score(first, 0, 5).unwrap());
        assert!(db.set_what_if_score(first, 1, 4).unwrap());
        let changed = db.get_match(first).unwrap().unwrap();
        assert_eq!(changed.score(), Some((1, 4)));
        assert!(changed.what_if);
        assert_eq!(changed.real_score(), Some((2, 0)));

        assert_eq!(db.restore_what_if().unwrap(), 1);
        let restored = db.get_match(first).unwrap().unwrap();
        assert_eq!(restored.score(), Some((2, 0)));
        assert!(!restored.what_if);
        assert_eq!(db.restore_what_if().unwrap(), 0);
    }

    #[test]
    fn what_if_on_a_fixture_restores_to_unplayed() {
        let (db, season_id, _) = seeded();
        let fixture = db.season_matches(season_id, None).unwrap()[2].id.unwrap();
        db.set_what_if_score(fixture, 3, 3).unwrap();
        assert!(db.get_match(fixture).unwrap().unwrap().is_played());

        db.restore_what_if().unwrap();
        assert!(!db.get_match(fixture).unwrap().unwrap().is_played());
    }

    #[test]
    fn what_if_on_unknown_match() {
        let (db, _, _) = seeded();
        assert!(!db.set_what_if_score(12345, 1, 0).unwrap());
    }

    #[test]
    fn negative_scores_are_refused() {
        let (db, season_id, teams) = seeded();
        let bad = fixture(season_id, Some(date(2024, 9, 15)), teams[0], teams[1], Some((-1, 0)));
        assert!(db.insert_match(&bad).is_err());
        assert_eq!(db.season_matches(season_id, None).unwrap().len(), 3);
    }
}
