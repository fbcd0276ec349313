use chrono::NaiveDate;
use clap::Parser;
use std::net::SocketAddr;

/// Longest form guide the table can show
pub const MAX_LAST_RESULTS: usize = 20;

/// League table viewer with end-of-season projections
#[derive(Parser, Debug, Clone)]
#[command(name = "league-table", version, about)]
pub struct Config {
    /// SQLite database path
    #[arg(long, env = "DATABASE_PATH", default_value = "league.db")]
    pub database_path: String,

    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "127.0.0.1:8080")]
    pub dashboard_addr: String,

    /// Season shown first (defaults to the most recent season)
    #[arg(long, env = "DEFAULT_SEASON")]
    pub season: Option<i64>,

    /// Print the season table to stdout and exit instead of serving the dashboard
    #[arg(long, default_value = "false")]
    pub print: bool,

    /// Show the table as it stood on this date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Combine home and away columns in printed output
    #[arg(long, default_value = "false")]
    pub combined: bool,

    /// Number of recent results in the form column (0 hides it)
    #[arg(long, env = "LAST_RESULTS", default_value = "5")]
    pub last_results: usize,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.last_results > MAX_LAST_RESULTS {
            anyhow::bail!("last_results must be between 0 and {MAX_LAST_RESULTS}");
        }
        if !self.print && self.dashboard_addr.parse::<SocketAddr>().is_err() {
            anyhow::bail!("dashboard_addr '{}' is not a socket address", self.dashboard_addr);
        }
        if self.date.is_some() && !self.print {
            anyhow::bail!("--date only applies together with --print");
        }
        if self.season.is_some_and(|id| id <= 0) {
            anyhow::bail!("season must be a positive season id");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("league-table").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        let config = parse(&[]);
        assert_eq!(config.database_path, "league.db");
        assert_eq!(config.last_results, 5);
        assert!(!config.print);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn print_mode_takes_a_date() {
        let config = parse(&["--print", "--season", "3", "--date", "2024-12-26", "--combined"]);
        assert_eq!(config.date, NaiveDate::from_ymd_opt(2024, 12, 26));
        assert_eq!(config.season, Some(3));
        assert!(config.combined);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn long_form_guide_is_rejected() {
        let config = parse(&["--last-results", "21"]);
        assert!(config.validate().is_err());
        assert!(parse(&["--last-results", "20"]).validate().is_ok());
    }

    #[test]
    fn date_without_print_is_rejected() {
        assert!(parse(&["--date", "2024-12-26"]).validate().is_err());
    }

    #[test]
    fn bad_listen_address_is_rejected() {
        assert!(parse(&["--dashboard-addr", "localhost"]).validate().is_err());
        assert!(parse(&["--dashboard-addr", "localhost", "--print"]).validate().is_ok());
    }
}
