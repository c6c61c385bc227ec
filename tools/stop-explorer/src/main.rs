use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use nextbus_core::config::{DEFAULT_MAX_DEPARTURES, DEFAULT_MAX_STOPS, DEFAULT_SEARCH_RADIUS_M};
use nextbus_core::history::POSITION_PARAM;
use nextbus_core::{
    Bootstrap, ClientConfig, Collaborators, HeadlessMap, Position, SessionHistory,
};
use nextbus_transit::{DepartureSource, HttpBackend, StaticStopDirectory, StopSearch};
use tracing::{info, warn, Level};
use tracing_subscriber::{
    filter::FilterFn, fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt,
};

mod report;
mod steps;

use steps::{parse_step, perform, Step};

#[derive(Parser, Debug)]
#[command(
    name = "stop-explorer",
    author,
    version,
    about = "Drive the next-bus client from the command line",
    long_about = "Starts the client on a headless map, replays a sequence of user steps \
                  (dragging the self marker, history navigation, stop clicks) and prints \
                  what the map would show afterwards.\n\n\
                  Lookups go either to a stop/departure service or to a JSON stop directory."
)]
struct Args {
    /// Base URL of the stop/departure service
    #[arg(long, env = "NEXTBUS_BACKEND", conflicts_with = "fixture")]
    backend: Option<String>,

    /// JSON stop directory to answer lookups from
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Start position as "latitude,longitude" (default: built-in start position)
    #[arg(short, long)]
    position: Option<Position>,

    /// Stop search radius in meters
    #[arg(long, default_value_t = DEFAULT_SEARCH_RADIUS_M)]
    radius: u32,

    /// Maximum stops per search
    #[arg(long, default_value_t = DEFAULT_MAX_STOPS)]
    max_stops: usize,

    /// Maximum departures shown per stop
    #[arg(long, default_value_t = DEFAULT_MAX_DEPARTURES)]
    max_departures: usize,

    /// Service request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Step to perform after startup: drag:LAT,LNG, back, forward, click:N or close.
    /// Repeat to perform several steps in order.
    #[arg(short, long = "step", value_parser = parse_step)]
    steps: Vec<Step>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let max_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = FilterFn::new(move |metadata| {
        metadata.level() <= &max_level
            && metadata
                .module_path()
                .is_some_and(|path| path.starts_with("nextbus") || path.starts_with("stop_explorer"))
    });
    let layer = tracing_subscriber::fmt::layer()
        .event_format(Format::default().without_time())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(layer).with(filter).init();
}

type Sources = (Arc<dyn StopSearch>, Arc<dyn DepartureSource>);

fn sources(args: &Args) -> Result<Sources> {
    if let Some(url) = &args.backend {
        info!(%url, "Using stop service");
        let backend = HttpBackend::new(url.as_str(), Duration::from_secs(args.timeout_secs))
            .context("Failed to create HTTP client")?;
        let backend = Arc::new(backend);
        let sources: Sources = (backend.clone(), backend);
        return Ok(sources);
    }

    if let Some(path) = &args.fixture {
        info!(path = %path.display(), "Using stop directory");
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let directory = StaticStopDirectory::from_json_slice(&bytes)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!(stops = directory.all_stops().len(), "Loaded stop directory");
        let directory = Arc::new(directory);
        let sources: Sources = (directory.clone(), directory);
        return Ok(sources);
    }

    bail!("Either --backend (or NEXTBUS_BACKEND) or --fixture is required");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let (stops, departures) = sources(&args)?;

    let map = Arc::new(HeadlessMap::new());
    let history = Arc::new(SessionHistory::new());
    let config = ClientConfig::default()
        .with_search_radius(args.radius)
        .with_max_stops(args.max_stops)
        .with_max_departures(args.max_departures);
    let messages = config.messages.clone();

    // An explicit position goes through the URL, as it would in a browser
    let query = args
        .position
        .map(|position| format!("?{}={}", POSITION_PARAM, position.to_url_value()));

    let collaborators = Collaborators {
        map: map.clone(),
        history: history.clone(),
        stops,
        departures,
    };
    let started = Bootstrap::new(config, collaborators)
        .run(query.as_deref())
        .await;
    info!(source = ?started.source, position = %started.client.position(), "Client ready");

    match started.discovery.await? {
        Ok(added) => info!(added, "Initial discovery finished"),
        Err(error) => warn!(%error, "Initial discovery failed"),
    }

    let client = started.client;
    for step in &args.steps {
        perform(step, &client, &map, &history).await?;
    }

    report::print_state(&client, &map, &history, &messages);
    Ok(())
}
