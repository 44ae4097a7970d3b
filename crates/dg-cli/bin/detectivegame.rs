//! Detective game console simulation
//!
//! Collects votes, allocates roles, prints the results, then optionally lets
//! the players' timers run before tearing the session down.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dg_cli::{OutputMode, StdoutNotifier, print_catalog, print_report, read_ballots};
use dg_core::{GameRng, GameSession, GameSettings, Notifier, RoleCatalog};

/// Detective game role allocation
#[derive(Parser, Debug)]
#[command(name = "detectivegame")]
#[command(author, version, about = "Detective game - vote for a role, find the killer", long_about = None)]
struct Args {
    /// Seed for a reproducible game
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Read the setup answers from a file instead of stdin
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Settings file (`key = value` lines)
    #[arg(long = "settings")]
    settings: Option<PathBuf>,

    /// Seconds of gameplay to simulate after allocation
    #[arg(short = 't', long = "run-for", default_value_t = 0)]
    run_for: u64,

    /// Print the report as JSON
    #[arg(long = "json")]
    json: bool,

    /// Debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "dg_core=debug,detectivegame=debug"
    } else {
        "dg_core=info,detectivegame=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Cancel `token` on Ctrl+C
fn setup_shutdown_signal(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received Ctrl+C, shutting down");
            token.cancel();
        }
    });
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let settings = match &args.settings {
        Some(path) => GameSettings::load_from_file(path).map_err(io::Error::other)?,
        None => GameSettings::default(),
    };
    let catalog = RoleCatalog::standard();

    let mut stdout = io::stdout();
    print_catalog(&mut stdout, &catalog)?;

    let ballots = match &args.input {
        Some(path) => read_ballots(&mut BufReader::new(File::open(path)?), &mut stdout, &catalog)?,
        None => read_ballots(&mut io::stdin().lock(), &mut stdout, &catalog)?,
    };

    let mut rng = args.seed.map_or_else(GameRng::from_entropy, GameRng::new);
    let notifier: Arc<dyn Notifier> = Arc::new(StdoutNotifier);
    let session = GameSession::start(catalog, settings, notifier, ballots, &mut rng)
        .map_err(io::Error::other)?;

    let mode = if args.json { OutputMode::Json } else { OutputMode::Text };
    print_report(&mut stdout, &session.report(), mode)?;

    if args.run_for > 0 {
        let shutdown = CancellationToken::new();
        setup_shutdown_signal(shutdown.clone());
        tokio::select! {
            _ = shutdown.cancelled() => {}
            _ = tokio::time::sleep(Duration::from_secs(args.run_for)) => {}
        }
        if !args.json {
            print_report(&mut stdout, &session.report(), OutputMode::Text)?;
        }
    }

    session.shutdown().await;
    Ok(())
}
