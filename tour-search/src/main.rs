use std::process::ExitCode;

use clap::Parser;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tour_search::ballparks::ballparks;
use tour_search::cli::{Cli, RunConfig};
use tour_search::domain::Schedule;
use tour_search::planner::{Gauge, Search};
use tour_search::state::{Fingerprint, StateFiles};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let venues = match ballparks() {
        Ok(venues) => venues,
        Err(e) => {
            error!("invalid venue table: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let run = match RunConfig::from_cli(Cli::parse(), &venues) {
        Ok(run) => run,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let schedule = match Schedule::load(&run.schedule_path, &venues, run.time_basis) {
        Ok(schedule) => schedule,
        Err(e) => {
            error!("failed to load schedule: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        events = schedule.len(),
        path = %run.schedule_path.display(),
        "loaded schedule"
    );

    // Lower the progress threshold periodically so output keeps flowing
    let gauge = Gauge::new();
    let decay = gauge.spawn_decay(run.decay_interval);

    let state = StateFiles::new(
        run.state.clone(),
        Fingerprint::new(&venues, &schedule, &run.search),
    );
    let result = tokio::task::spawn_blocking(move || {
        let outcome = Search::new(&venues, &schedule, run.search)
            .with_state(state)
            .with_gauge(gauge)
            .run(&run.seed);
        outcome.map(|outcome| (outcome, venues))
    })
    .await;
    decay.abort();

    let (outcome, venues) = match result {
        Ok(Ok(done)) => done,
        Ok(Err(e)) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            error!("search task failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        nodes = outcome.stats.nodes,
        solutions = outcome.stats.solutions,
        improvements = outcome.stats.improvements,
        dead_ends = outcome.stats.dead_ends_recorded,
        "search complete"
    );
    match outcome.best {
        Some(best) => {
            for stop in best.itinerary.stops() {
                info!("{}", stop.event.display(&venues));
            }
            info!(length = best.length, days = best.days, "best itinerary");
        }
        None => info!("no complete itinerary found"),
    }
    ExitCode::SUCCESS
}
