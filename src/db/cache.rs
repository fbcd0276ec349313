//! Read-through lookups for a single rendering request.
//!
//! A table page resolves the same handful of teams and seasons many times
//! over. The cache lives only as long as the request that owns it and is
//! handed down by `&mut`, so nothing outlives the page it was built for.

use anyhow::Result;
use std::collections::HashMap;
use tracing::debug;

use super::models::{Season, Team, TeamId};
use super::Database;

pub struct RequestCache<'a> {
    db: &'a Database,
    teams: HashMap<TeamId, Option<Team>>,
    seasons: HashMap<i64, Option<Season>>,
    misses: usize,
}

impl<'a> RequestCache<'a> {
    pub fn new(db: &'a Database) -> Self {
        RequestCache {
            db,
            teams: HashMap::new(),
            seasons: HashMap::new(),
            misses: 0,
        }
    }

    pub fn team(&mut self, id: TeamId) -> Result<Option<&Team>> {
        if !self.teams.contains_key(&id) {
            let team = self.db.get_team(id)?;
            self.misses += 1;
            self.teams.insert(id, team);
        }
        Ok(self.teams.get(&id).and_then(|team| team.as_ref()))
    }

    /// Team name for display; unknown ids render as `#id`.
    pub fn team_name(&mut self, id: TeamId) -> Result<String> {
        Ok(match self.team(id)? {
            Some(team) => team.name.clone(),
            None => format!("#{id}"),
        })
    }

    pub fn season(&mut self, id: i64) -> Result<Option<&Season>> {
        if !self.seasons.contains_key(&id) {
            let season = self.db.get_season(id)?;
            self.misses += 1;
            self.seasons.insert(id, season);
        }
        Ok(self.seasons.get(&id).and_then(|season| season.as_ref()))
    }

    /// Store round trips made so far.
    pub fn misses(&self) -> usize {
        self.misses
    }
}

impl Drop for RequestCache<'_> {
    fn drop(&mut self) {
        debug!(
            "RequestCache: {} teams, {} seasons, {} lookups",
            self.teams.len(),
            self.seasons.len(),
            self.misses()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::seeded;

    #[test]
    fn repeated_lookups_hit_the_store_once() {
        let (db, season_id, teams) = seeded();
        let mut cache = RequestCache::new(&db);

        assert_eq!(cache.team_name(teams[0]).unwrap(), "Ashby");
        assert_eq!(cache.team_name(teams[0]).unwrap(), "Ashby");
        assert_eq!(cache.team(teams[1]).unwrap().map(|t| t.name.as_str()), Some("Burton"));
        assert_eq!(cache.season(season_id).unwrap().map(|s| s.num_matches), Some(4));
        cache.season(season_id).unwrap();
        assert_eq!(cache.misses(), 3);
    }

    #[test]
    fn unknown_ids_are_remembered_too() {
        let (db, _, _) = seeded();
        let mut cache = RequestCache::new(&db);
        assert_eq!(cache.team_name(404).unwrap(), "#404");
        assert!(cache.team(404).unwrap().is_none());
        assert!(cache.season(404).unwrap().is_none());
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn a_new_request_sees_fresh_data() {
        let (db, _, teams) = seeded();
        {
            let mut cache = RequestCache::new(&db);
            assert!(!cache.team(teams[0]).unwrap().map(|t| t.sub_group).unwrap_or(true));
        }
        db.set_sub_group(teams[0], true).unwrap();
        let mut cache = RequestCache::new(&db);
        assert!(cache.team(teams[0]).unwrap().map(|t| t.sub_group).unwrap_or(false));
    }
}
