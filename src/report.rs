//! Plain-text league table for the terminal.

use anyhow::Result;
use std::fmt::Write;

use crate::db::models::Outcome;
use crate::db::RequestCache;
use crate::standings::{LeagueTable, TableEntry, Zone};

const NAME_WIDTH: usize = 24;

fn form_letter(outcome: Outcome) -> char {
    match outcome {
        Outcome::Win => 'W',
        Outcome::Draw => 'D',
        Outcome::Loss => 'L',
    }
}

fn zone_marker(zone: Zone) -> char {
    match zone {
        Zone::Qualification => '+',
        Zone::SecondaryQualification => '*',
        Zone::Neutral => ' ',
        Zone::Relegation => '-',
    }
}

fn record_columns(entry: &TableEntry, combined: bool) -> String {
    let r = &entry.ranked.row;
    if combined {
        format!(
            "{:>3} {:>3} {:>3} {:>3} {:>4} {:>4}",
            r.played(),
            r.wins(),
            r.draws(),
            r.losses(),
            r.goals_for(),
            r.goals_against()
        )
    } else {
        format!(
            "{:>3} {:>2} {:>2} {:>2} {:>3} {:>3}  {:>2} {:>2} {:>2} {:>3} {:>3}",
            r.played(),
            r.home_wins,
            r.home_draws,
            r.home_losses,
            r.home_for,
            r.home_against,
            r.away_wins,
            r.away_draws,
            r.away_losses,
            r.away_for,
            r.away_against
        )
    }
}

fn record_header(combined: bool) -> String {
    if combined {
        format!("{:>3} {:>3} {:>3} {:>3} {:>4} {:>4}", "P", "W", "D", "L", "F", "A")
    } else {
        format!(
            "{:>3} {:>2} {:>2} {:>2} {:>3} {:>3}  {:>2} {:>2} {:>2} {:>3} {:>3}",
            "P", "W", "D", "L", "F", "A", "W", "D", "L", "F", "A"
        )
    }
}

/// Render `table` with season and team names resolved through `cache`.
pub fn render_table(
    table: &LeagueTable,
    cache: &mut RequestCache<'_>,
    combined: bool,
) -> Result<String> {
    let mut out = String::new();

    let heading = match table.season_id {
        Some(id) => cache.season(id)?.map(|season| season.name.clone()),
        None => None,
    };
    if let Some(heading) = heading {
        write!(out, "{heading}")?;
        match table.as_of {
            Some(date) => writeln!(out, " on {date}")?,
            None => writeln!(out)?,
        }
    }

    let show_form = table.entries.iter().any(|e| !e.form.results.is_empty());
    write!(
        out,
        "{:>3}  {:<width$} {} {:>4} {:>4}",
        "Pos",
        "Team",
        record_header(combined),
        "GD",
        "Pts",
        width = NAME_WIDTH
    )?;
    if table.show_projection {
        write!(out, " {:>7} {:>7}", "Finish", "Expect")?;
    }
    if show_form {
        write!(out, "  Form")?;
    }
    writeln!(out)?;

    for entry in &table.entries {
        let name: String = cache.team_name(entry.team_id())?.chars().take(NAME_WIDTH).collect();
        write!(
            out,
            "{:>3}{} {:<width$} {} {:>+4} {:>4}",
            entry.ranked.position,
            zone_marker(entry.zone),
            name,
            record_columns(entry, combined),
            entry.ranked.goal_difference,
            entry.ranked.points,
            width = NAME_WIDTH
        )?;
        if table.show_projection {
            let range = entry.rank_range.map(|r| r.to_string()).unwrap_or_default();
            let expected = entry
                .projection
                .filter(|p| !p.is_empty())
                .map(|p| format!("{:.1}", p.expected_points))
                .unwrap_or_else(|| "-".into());
            write!(out, " {range:>7} {expected:>7}")?;
        }
        if show_form {
            let form: String = entry.form.results.iter().rev().map(|o| form_letter(*o)).collect();
            write!(out, "  {form}")?;
        }
        writeln!(out)?;
    }

    if let Some(points) = table.thresholds.required() {
        writeln!(out, "Qualification pace: {points} pts")?;
    }
    if let Some(points) = table.thresholds.safe() {
        writeln!(out, "Safety pace: {points} pts")?;
    }
    Ok(out)
}
