use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::config::MAX_LAST_RESULTS;
use crate::db::models::{Match, Season, Team, TeamId};
use crate::db::{Database, RequestCache};
use crate::standings::aggregate::{check_scores, teams_in};
use crate::standings::history::{
    head_to_head, on_or_before, points_progression, position_history, prediction_history, recent_form,
    result_distribution, rolling_points, Form, HeadToHead, ProgressPoint,
};
use crate::standings::{aggregate, project, LeagueTable, ProjectionInterval, StandingsError, StandingsRow};

/// Matches per window in the rolling points line
const ROLLING_WINDOW: usize = 5;
/// Margins beyond this many goals share the end buckets of the distribution
const MAX_MARGIN: i32 = 4;
/// Rows in the recent results and upcoming fixtures lists
const MATCH_LIST_LIMIT: u32 = 20;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Season shown by the home page, the latest one when unset
    pub default_season: Option<i64>,
    pub last_results: usize,
}

type ApiError = (StatusCode, String);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn internal(e: anyhow::Error) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn unprocessable(e: StandingsError) -> ApiError {
    warn!("Table render failed: {}", e);
    (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
}

fn not_found(what: &str, id: i64) -> ApiError {
    (StatusCode::NOT_FOUND, format!("{what} {id} not found"))
}

/// Build the Axum router for the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/seasons", get(seasons_handler))
        .route("/api/seasons/:id/table", get(season_table_handler))
        .route("/api/seasons/:id/matches", get(season_matches_handler))
        .route("/api/seasons/:id/last", get(last_results_handler))
        .route("/api/teams", get(teams_handler))
        .route("/api/teams/:team_id/seasons/:season_id", get(team_season_handler))
        .route("/api/table", get(date_range_handler))
        .route("/api/subset", get(subset_handler))
        .route("/api/teams/:id/sub-group", post(sub_group_handler))
        .route("/api/matches/:id/what-if", post(what_if_handler))
        .route("/api/what-if/restore", post(restore_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Serve the dashboard HTML page, injecting the starting season.
async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let season = state
        .default_season
        .map(|id| id.to_string())
        .unwrap_or_default();
    let html = DASHBOARD_HTML.replace(
        r#"<body>"#,
        &format!(
            r#"<body data-season="{}" data-last="{}">"#,
            season, state.last_results
        ),
    );
    Html(html)
}

// ── Responses ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub season: Option<Season>,
    pub previous: Option<Season>,
    pub next: Option<Season>,
    pub table: LeagueTable,
    pub names: BTreeMap<TeamId, String>,
}

#[derive(Debug, Serialize)]
pub struct MatchView {
    #[serde(flatten)]
    pub fixture: Match,
    pub home_team: String,
    pub away_team: String,
    /// Score before any what-if override
    pub real_score: Option<(i32, i32)>,
    /// Display date, `?`-suffixed when the date is a guess
    pub date_label: String,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub recent: Vec<MatchView>,
    pub upcoming: Vec<MatchView>,
}

#[derive(Debug, Serialize)]
pub struct TeamSeasonReport {
    pub team: Team,
    pub season: Season,
    pub as_of: Option<NaiveDate>,
    pub row: StandingsRow,
    /// Fractions won, drawn and lost
    pub ratio: (f64, f64, f64),
    pub projection: ProjectionInterval,
    pub form: Form,
    pub progression: Vec<ProgressPoint>,
    pub positions: Vec<usize>,
    pub rolling_points: Vec<i32>,
    pub predictions: Vec<ProjectionInterval>,
    pub distribution: BTreeMap<i32, u32>,
    pub head_to_head: Vec<HeadToHead>,
    pub matches: Vec<MatchView>,
    pub names: BTreeMap<TeamId, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Restored {
    pub restored: usize,
}

// ── Queries ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    pub date: Option<NaiveDate>,
    pub last_results: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LastQuery {
    pub date: Option<NaiveDate>,
    pub last: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<NaiveDate>,
    pub finish: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SubGroupUpdate {
    pub included: bool,
}

#[derive(Debug, Deserialize)]
pub struct WhatIfScore {
    pub home_goals: i32,
    pub away_goals: i32,
}

fn form_length(requested: Option<usize>, default: usize) -> Result<usize, ApiError> {
    let n = requested.unwrap_or(default);
    if n > MAX_LAST_RESULTS {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("at most {MAX_LAST_RESULTS} results can be shown"),
        ));
    }
    Ok(n)
}

fn names_for(
    cache: &mut RequestCache<'_>,
    teams: impl IntoIterator<Item = TeamId>,
) -> anyhow::Result<BTreeMap<TeamId, String>> {
    let mut names = BTreeMap::new();
    for team in teams {
        if !names.contains_key(&team) {
            names.insert(team, cache.team_name(team)?);
        }
    }
    Ok(names)
}

fn match_views(cache: &mut RequestCache<'_>, matches: Vec<Match>) -> anyhow::Result<Vec<MatchView>> {
    matches
        .into_iter()
        .map(|fixture| {
            Ok(MatchView {
                home_team: cache.team_name(fixture.home_team_id)?,
                away_team: cache.team_name(fixture.away_team_id)?,
                real_score: fixture.real_score(),
                date_label: date_label(&fixture),
                fixture,
            })
        })
        .collect()
}

fn date_label(m: &Match) -> String {
    match m.date {
        Some(date) if m.date_is_guess => format!("{date}?"),
        Some(date) => date.to_string(),
        None => String::new(),
    }
}

fn load_season(db: &Database, id: i64) -> Result<Season, ApiError> {
    db.get_season(id)
        .map_err(internal)?
        .ok_or_else(|| not_found("season", id))
}

fn table_response(db: &Database, season: Option<Season>, table: LeagueTable) -> ApiResult<TableResponse> {
    let (previous, next) = match &season {
        Some(season) => db.adjacent_seasons(season).map_err(internal)?,
        None => (None, None),
    };
    let mut cache = RequestCache::new(db);
    let names = names_for(&mut cache, table.entries.iter().map(|e| e.team_id())).map_err(internal)?;
    Ok(Json(TableResponse {
        season,
        previous,
        next,
        table,
        names,
    }))
}

// ── Handlers ───────────────────────────────────────────────────────────────────

/// GET /api/seasons
async fn seasons_handler(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Season>> {
    state.db.list_seasons().map(Json).map_err(internal)
}

/// GET /api/teams
async fn teams_handler(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Team>> {
    state.db.list_teams().map(Json).map_err(internal)
}

/// GET /api/seasons/:id/table?date=2024-12-26&last_results=5
async fn season_table_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<TableQuery>,
) -> ApiResult<TableResponse> {
    let season = load_season(&state.db, id)?;
    let last_results = form_length(query.last_results, state.last_results)?;
    let matches = state.db.season_matches(id, None).map_err(internal)?;
    let table = LeagueTable::build(&season, &matches, &[], query.date, last_results)
        .map_err(unprocessable)?;
    table_response(&state.db, Some(season), table)
}

/// GET /api/seasons/:id/matches?date=2024-12-26
async fn season_matches_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<TableQuery>,
) -> ApiResult<MatchesResponse> {
    let season = load_season(&state.db, id)?;
    let date = season.cut_off(query.date);
    let recent = state
        .db
        .recent_results(id, date, MATCH_LIST_LIMIT)
        .map_err(internal)?;
    let upcoming = state
        .db
        .upcoming_matches(id, date, MATCH_LIST_LIMIT)
        .map_err(internal)?;
    let mut cache = RequestCache::new(&state.db);
    Ok(Json(MatchesResponse {
        recent: match_views(&mut cache, recent).map_err(internal)?,
        upcoming: match_views(&mut cache, upcoming).map_err(internal)?,
    }))
}

/// GET /api/seasons/:id/last?date=2024-12-26&last=6
async fn last_results_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<LastQuery>,
) -> ApiResult<TableResponse> {
    let season = load_season(&state.db, id)?;
    let last = form_length(query.last, state.last_results)?;
    let matches = state.db.season_matches(id, None).map_err(internal)?;
    let table = LeagueTable::last_results(&season, &matches, query.date, last);
    table_response(&state.db, Some(season), table)
}

/// GET /api/teams/:team_id/seasons/:season_id?date=2024-12-26&last_results=5
async fn team_season_handler(
    State(state): State<Arc<AppState>>,
    Path((team_id, season_id)): Path<(TeamId, i64)>,
    Query(query): Query<TableQuery>,
) -> ApiResult<TeamSeasonReport> {
    let db = &state.db;
    let season = load_season(db, season_id)?;
    let team = db
        .get_team(team_id)
        .map_err(internal)?
        .ok_or_else(|| not_found("team", team_id))?;
    let last_results = form_length(query.last_results, state.last_results)?;
    let as_of = season.cut_off(query.date);

    let all = db.season_matches(season_id, None).map_err(internal)?;
    let teams = teams_in(&all);
    let matches: Vec<Match> = all.into_iter().filter(|m| on_or_before(m, as_of)).collect();
    check_scores(&matches).map_err(unprocessable)?;
    let row = aggregate(&matches, team_id);
    let projection = project(team_id, &row, &season).map_err(unprocessable)?;
    let progression = points_progression(&matches, team_id, true);

    let own: Vec<Match> = matches.iter().filter(|m| m.involves(team_id)).cloned().collect();
    let mut cache = RequestCache::new(db);
    let report = TeamSeasonReport {
        ratio: row.ratio(),
        form: recent_form(&matches, team_id, as_of, last_results),
        rolling_points: rolling_points(&progression, ROLLING_WINDOW),
        positions: position_history(&matches, team_id, &teams),
        predictions: prediction_history(&matches, team_id, season.num_matches),
        distribution: result_distribution(&matches, team_id, -MAX_MARGIN, MAX_MARGIN),
        head_to_head: head_to_head(&matches, team_id, &teams),
        matches: match_views(&mut cache, own).map_err(internal)?,
        names: names_for(&mut cache, teams.iter().copied()).map_err(internal)?,
        progression,
        projection,
        row,
        team,
        season,
        as_of,
    };
    Ok(Json(report))
}

/// GET /api/table?start=2000-01-01&finish=2024-12-31
async fn date_range_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<TableResponse> {
    let matches = state
        .db
        .matches_between(query.start, query.finish)
        .map_err(internal)?;
    let table = LeagueTable::between(&matches, query.start, query.finish);
    table_response(&state.db, None, table)
}

/// GET /api/subset?start=&finish=
async fn subset_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<TableResponse> {
    let members: Vec<TeamId> = state
        .db
        .sub_group_teams()
        .map_err(internal)?
        .into_iter()
        .map(|t| t.id)
        .collect();
    let matches = state
        .db
        .matches_between(query.start, query.finish)
        .map_err(internal)?;
    let table = LeagueTable::subset(&matches, &members, query.start, query.finish);
    table_response(&state.db, None, table)
}

/// POST /api/teams/:id/sub-group  {"included": true}
async fn sub_group_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TeamId>,
    Json(update): Json<SubGroupUpdate>,
) -> Result<StatusCode, ApiError> {
    if !state.db.set_sub_group(id, update.included).map_err(internal)? {
        return Err(not_found("team", id));
    }
    info!("Team {} sub-group membership set to {}", id, update.included);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/matches/:id/what-if  {"home_goals": 2, "away_goals": 1}
async fn what_if_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(score): Json<WhatIfScore>,
) -> ApiResult<Match> {
    if score.home_goals < 0 || score.away_goals < 0 {
        return Err((StatusCode::BAD_REQUEST, "goals cannot be negative".into()));
    }
    if !state
        .db
        .set_what_if_score(id, score.home_goals, score.away_goals)
        .map_err(internal)?
    {
        return Err(not_found("match", id));
    }
    info!(
        "What-if score for match {}: {}-{}",
        id, score.home_goals, score.away_goals
    );
    state
        .db
        .get_match(id)
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found("match", id))
}

/// POST /api/what-if/restore
async fn restore_handler(State(state): State<Arc<AppState>>) -> ApiResult<Restored> {
    let restored = state.db.restore_what_if().map_err(internal)?;
    info!("Restored {} real score(s)", restored);
    Ok(Json(Restored { restored }))
}

/// Embedded single-file dashboard (HTML + CSS + JS)
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>League Table</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #6c63ff;
    --green: #00c896;
    --pale: #5fa88f;
    --red: #ff4f6a;
    --amber: #ffb300;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  header select, header input, header button { background: var(--card); color: var(--text); border: 1px solid var(--border); border-radius: 6px; padding: .3rem .6rem; }
  header button:hover { border-color: var(--accent); color: var(--accent); cursor: pointer; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; overflow: hidden; }
  .panel-header { padding: .9rem 1.2rem; border-bottom: 1px solid var(--border); font-weight: 600; display: flex; justify-content: space-between; align-items: center; }
  table { width: 100%; border-collapse: collapse; }
  th { padding: .6rem .8rem; text-align: right; font-size: .75rem; text-transform: uppercase; color: var(--muted); border-bottom: 1px solid var(--border); }
  td { padding: .5rem .8rem; font-size: .88rem; border-bottom: 1px solid #1e2130; text-align: right; }
  th.name, td.name { text-align: left; }
  tr:last-child td { border-bottom: none; }
  tr.qualification td:first-child { border-left: 4px solid var(--green); }
  tr.secondary_qualification td:first-child { border-left: 4px solid var(--pale); }
  tr.relegation td:first-child { border-left: 4px solid var(--red); }
  .bar { position: relative; height: 10px; width: 220px; background: #12141c; border-radius: 3px; }
  .bar .range { position: absolute; height: 10px; background: rgba(108,99,255,.25); }
  .bar .conf { position: absolute; height: 10px; background: rgba(108,99,255,.6); }
  .bar .now { position: absolute; width: 2px; height: 10px; background: var(--text); }
  .wdl { display: inline-block; width: 14px; height: 14px; margin-left: 2px; border-radius: 2px; }
  .wdl.win { background: var(--green); }
  .wdl.draw { background: var(--amber); }
  .wdl.loss { background: var(--red); }
  .two-col { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
  @media (max-width: 900px) { .two-col { grid-template-columns: 1fr; } }
  .empty { color: var(--muted); text-align: center; padding: 2rem; font-size: .9rem; }
  .muted { color: var(--muted); font-size: .8rem; }
</style>
</head>
<body>
<header>
  <h1>League Table</h1>
  <select id="season-select"></select>
  <input type="date" id="date-input">
  <button onclick="loadAll()">Show</button>
  <button onclick="restoreWhatIf()">Restore real scores</button>
  <span style="margin-left:auto;" class="muted" id="thresholds"></span>
</header>

<main>
  <div class="panel">
    <div class="panel-header"><span id="table-title">Table</span><span class="muted" id="nav"></span></div>
    <table>
      <thead><tr>
        <th>#</th><th class="name">Team</th><th>P</th><th>W</th><th>D</th><th>L</th>
        <th>F</th><th>A</th><th>GD</th><th>Pts</th><th>Finish</th><th>Projection</th><th class="name">Form</th>
      </tr></thead>
      <tbody id="table-tbody"><tr><td colspan="13" class="empty">Loading…</td></tr></tbody>
    </table>
  </div>

  <div class="two-col">
    <div class="panel">
      <div class="panel-header">Recent Results</div>
      <table><tbody id="recent-tbody"><tr><td class="empty">Loading…</td></tr></tbody></table>
    </div>
    <div class="panel">
      <div class="panel-header">Upcoming</div>
      <table><tbody id="upcoming-tbody"><tr><td class="empty">Loading…</td></tr></tbody></table>
    </div>
  </div>

  <div class="two-col">
    <div class="panel">
      <div class="panel-header">Sub-group</div>
      <table><tbody id="teams-tbody"><tr><td class="empty">Loading…</td></tr></tbody></table>
    </div>
    <div class="panel">
      <div class="panel-header">Sub-group Table</div>
      <table>
        <thead><tr><th>#</th><th class="name">Team</th><th>P</th><th>GD</th><th>Pts</th></tr></thead>
        <tbody id="subset-tbody"><tr><td colspan="5" class="empty">Loading…</td></tr></tbody>
      </table>
    </div>
  </div>
</main>

<script>
const lastResults = Number(document.body.dataset.last || 5);
let currentSeason = document.body.dataset.season || '';

function bar(p, lo, hi) {
  if (!p || p.played === 0 || hi <= lo) return '';
  const x = v => ((v - lo) / (hi - lo) * 100).toFixed(1) + '%';
  const w = (a, b) => ((b - a) / (hi - lo) * 100).toFixed(1) + '%';
  return `<div class="bar">
    <div class="range" style="left:${x(p.min_points)};width:${w(p.min_points, p.max_points)}"></div>
    <div class="conf" style="left:${x(p.confidence_min)};width:${w(p.confidence_min, p.confidence_max)}"></div>
    <div class="now" style="left:${x(p.expected_points)}" title="${p.expected_points.toFixed(1)}"></div>
  </div>`;
}

function form(f) {
  return f.results.slice().reverse().map(r => `<span class="wdl ${r}"></span>`).join('');
}

async function loadSeasons() {
  const r = await fetch('/api/seasons');
  if (!r.ok) return;
  const seasons = await r.json();
  const select = document.getElementById('season-select');
  select.innerHTML = seasons.map(s => `<option value="${s.id}">${s.name}</option>`).join('');
  if (!currentSeason && seasons.length) currentSeason = String(seasons[0].id);
  select.value = currentSeason;
  select.onchange = () => { currentSeason = select.value; loadAll(); };
}

async function loadTable() {
  if (!currentSeason) return;
  const date = document.getElementById('date-input').value;
  const q = new URLSearchParams({ last_results: lastResults });
  if (date) q.set('date', date);
  const r = await fetch(`/api/seasons/${currentSeason}/table?${q}`);
  const tbody = document.getElementById('table-tbody');
  if (!r.ok) { tbody.innerHTML = `<tr><td colspan="13" class="empty">${await r.text()}</td></tr>`; return; }
  const { season, previous, next, table, names } = await r.json();
  document.getElementById('table-title').textContent = season.name + (table.as_of ? ' on ' + table.as_of : '');
  document.getElementById('nav').textContent = [previous && '← ' + previous.name, next && next.name + ' →'].filter(Boolean).join('  ');
  const t = table.thresholds;
  document.getElementById('thresholds').textContent = [
    t.required_points ? `Qualification pace ${t.required_points}` : '',
    t.safe_points ? `Safety pace ${t.safe_points}` : '',
  ].filter(Boolean).join(' · ');
  if (!table.entries.length) { tbody.innerHTML = '<tr><td colspan="13" class="empty">No matches yet</td></tr>'; return; }
  tbody.innerHTML = table.entries.map(e => {
    const row = e.row;
    const w = row.home_wins + row.away_wins, d = row.home_draws + row.away_draws, l = row.home_losses + row.away_losses;
    const f = row.home_for + row.away_for, a = row.home_against + row.away_against;
    const rr = e.rank_range ? (e.rank_range.best === e.rank_range.worst ? e.rank_range.best : `${e.rank_range.best}-${e.rank_range.worst}`) : '';
    return `<tr class="${e.zone}">
      <td>${e.position}</td>
      <td class="name">${names[e.team_id] || e.team_id}</td>
      <td>${w + d + l}</td><td>${w}</td><td>${d}</td><td>${l}</td><td>${f}</td><td>${a}</td>
      <td>${e.goal_difference > 0 ? '+' : ''}${e.goal_difference}</td>
      <td><b>${e.points}</b></td>
      <td>${table.show_projection ? rr : ''}</td>
      <td>${table.show_projection ? bar(e.projection, table.scale_min, table.scale_max) : ''}</td>
      <td class="name">${form(e.form)}</td>
    </tr>`;
  }).join('');
}

function matchRow(m) {
  const real = m.what_if ? (m.real_score ? m.real_score.join('-') : 'unplayed') : '';
  const score = m.home_goals != null ? `<span title="${real}">${m.home_goals}-${m.away_goals}${m.what_if ? '*' : ''}</span>` : 'v';
  return `<tr><td class="name muted">${m.date_label}</td><td class="name">${m.home_team}</td><td>${score}</td><td class="name">${m.away_team}</td></tr>`;
}

async function loadMatches() {
  if (!currentSeason) return;
  const date = document.getElementById('date-input').value;
  const r = await fetch(`/api/seasons/${currentSeason}/matches` + (date ? `?date=${date}` : ''));
  if (!r.ok) return;
  const { recent, upcoming } = await r.json();
  document.getElementById('recent-tbody').innerHTML = recent.length ? recent.map(matchRow).join('') : '<tr><td class="empty">No results</td></tr>';
  document.getElementById('upcoming-tbody').innerHTML = upcoming.length ? upcoming.map(matchRow).join('') : '<tr><td class="empty">No fixtures</td></tr>';
}

async function loadTeams() {
  const r = await fetch('/api/teams');
  if (!r.ok) return;
  const teams = await r.json();
  document.getElementById('teams-tbody').innerHTML = teams.length
    ? teams.map(t => `<tr><td class="name">${t.name}</td><td><input type="checkbox" ${t.sub_group ? 'checked' : ''} onchange="setSubGroup(${t.id}, this.checked)"></td></tr>`).join('')
    : '<tr><td class="empty">No teams</td></tr>';
}

async function setSubGroup(id, included) {
  await fetch(`/api/teams/${id}/sub-group`, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ included }),
  });
  loadSubset();
}

async function loadSubset() {
  const r = await fetch('/api/subset');
  const tbody = document.getElementById('subset-tbody');
  if (!r.ok) return;
  const { table, names } = await r.json();
  tbody.innerHTML = table.entries.length
    ? table.entries.map(e => `<tr><td>${e.position}</td><td class="name">${names[e.team_id] || e.team_id}</td><td>${e.row.home_wins + e.row.home_draws + e.row.home_losses + e.row.away_wins + e.row.away_draws + e.row.away_losses}</td><td>${e.goal_difference}</td><td><b>${e.points}</b></td></tr>`).join('')
    : '<tr><td colspan="5" class="empty">No sub-group matches</td></tr>';
}

async function restoreWhatIf() {
  await fetch('/api/what-if/restore', { method: 'POST' });
  loadAll();
}

async function loadAll() {
  await Promise.all([loadTable(), loadMatches()]);
}

loadSeasons().then(loadAll);
loadTeams().then(loadSubset);
</script>
</body>
</html>"#;
