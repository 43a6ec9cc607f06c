//! Command-line and environment configuration.
//!
//! Usage: `tour-search <day-budget> [seed-index...]`. Every option can also be
//! set through its `TOUR_*` environment variable.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::domain::{EventId, LongHaulRule, ReachRules, TimeBasis, VenueTable};
use crate::planner::{DEFAULT_DECAY_INTERVAL, HomeBase, SearchConfig};
use crate::state::StateConfig;

/// Errors in the command line or environment that clap cannot check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CliError {
    /// The home venue code is not in the venue table
    #[error("unknown home venue: {0}")]
    UnknownHome(String),
}

/// Search for the shortest tour attending a game at every ballpark.
#[derive(Debug, Clone, Parser)]
#[command(name = "tour-search", version)]
pub struct Cli {
    /// Days available for the whole trip
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub day_budget: u32,

    /// Schedule positions of the first stops, in order
    pub seed: Vec<u32>,

    /// Venue code the trip starts and ends at
    #[arg(long, env = "TOUR_HOME")]
    pub home: Option<String>,

    /// Drive minutes per extra day spent getting to and from home
    #[arg(long, env = "TOUR_HOME_PAD_MINUTES")]
    pub home_pad_minutes: Option<u32>,

    /// Daily driving allowance; enables the multi-day driving rule
    #[arg(long, env = "TOUR_DAILY_DRIVE_MINUTES")]
    pub daily_drive_minutes: Option<i64>,

    /// Seconds between progress threshold decays
    #[arg(long, env = "TOUR_DECAY_SECS", default_value_t = DEFAULT_DECAY_INTERVAL.as_secs())]
    pub decay_secs: u64,

    /// The schedule holds venue-local start times
    #[arg(
        long,
        env = "TOUR_LOCAL_TIMES",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub local_times: bool,

    /// Schedule file
    #[arg(long, env = "TOUR_SCHEDULE", default_value = "Games.csv")]
    pub schedule: PathBuf,

    /// Directory holding the state files
    #[arg(long, env = "TOUR_STATE_DIR", default_value = ".")]
    pub state_dir: PathBuf,
}

/// Everything needed for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub search: SearchConfig,
    pub seed: Vec<EventId>,
    pub schedule_path: PathBuf,
    pub time_basis: TimeBasis,
    pub state: StateConfig,
    pub decay_interval: Duration,
}

impl RunConfig {
    /// Resolve parsed arguments against the venue table.
    pub fn from_cli(cli: Cli, venues: &VenueTable) -> Result<Self, CliError> {
        let mut search = SearchConfig::new(cli.day_budget);
        if let Some(code) = cli.home {
            let venue = venues
                .lookup(code.trim())
                .ok_or_else(|| CliError::UnknownHome(code.clone()))?;
            let mut home = HomeBase::new(venue);
            if let Some(minutes) = cli.home_pad_minutes {
                home = home.with_day_padding(minutes);
            }
            search = search.with_home(home);
        }
        if let Some(daily) = cli.daily_drive_minutes {
            let rule = LongHaulRule {
                daily_drive_minutes: daily,
                ..LongHaulRule::default()
            };
            search = search.with_rules(ReachRules::default().with_long_haul(rule));
        }

        Ok(Self {
            search,
            seed: cli.seed.into_iter().map(EventId).collect(),
            schedule_path: cli.schedule,
            time_basis: if cli.local_times {
                TimeBasis::Local
            } else {
                TimeBasis::Reference
            },
            state: StateConfig::new(cli.state_dir),
            decay_interval: Duration::from_secs(cli.decay_secs),
        })
    }
}
