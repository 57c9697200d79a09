//! Pineapple poker venue simulator.
//!
//! Opens tables on an in-process venue, seats funded players, and plays
//! scored rounds while checking that escrow, ledger, and token custody agree.

mod config;
mod logging;
mod scorer;
mod sim;

use anyhow::{Context, Error};
use config::SimConfig;
use pico_args::Arguments;
use pineapple_poker::account::{TOKEN_DECIMALS, format_units};
use sim::Simulation;
use std::path::PathBuf;

const HELP: &str = "\
Simulate rounds on a pineapple poker venue

USAGE:
  pp_sim [OPTIONS]

OPTIONS:
  --tables     N           Number of tables to open    [default: env SIM_TABLES or 1]
  --players    N           Players seated per table    [default: env SIM_PLAYERS or 2]
  --rounds     N           Rounds to play per table    [default: env SIM_ROUNDS or 10]
  --seed       N           Shuffle and scoring seed    [default: env VENUE_SHUFFLE_SEED or OS entropy]
  --snapshot   PATH        Write final venue state as JSON

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  VENUE_MIN_PLAYERS        Smallest allowed table capacity
  VENUE_MAX_PLAYERS        Largest allowed table capacity
  VENUE_SETTLEMENT         pairwise or pooled
  SIM_MAX_PLAYERS          Capacity of every simulated table
  SIM_BUY_IN               Table buy-in in tokens (e.g., 10)
  SIM_POINTS_COST          Value of one point in tokens (e.g., 0.1)
  SIM_WALLET               Tokens funded to every player
  RUST_LOG                 Log filter (e.g., info,pineapple_poker=debug)
  (See .env file for all configuration options)
";

struct Args {
    tables: Option<usize>,
    players: Option<usize>,
    rounds: Option<usize>,
    seed: Option<u64>,
    snapshot: Option<PathBuf>,
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        tables: pargs.opt_value_from_str("--tables")?,
        players: pargs.opt_value_from_str("--players")?,
        rounds: pargs.opt_value_from_str("--rounds")?,
        seed: pargs.opt_value_from_str("--seed")?,
        snapshot: pargs.opt_value_from_str("--snapshot")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {remaining:?}");
    }

    logging::init();

    let config = SimConfig::from_env(args.tables, args.players, args.rounds, args.seed)?;
    config.validate()?;
    log::info!(
        "Simulating {} table(s) of {} players for {} rounds, buy-in {}",
        config.tables,
        config.players,
        config.rounds,
        format_units(config.buy_in, TOKEN_DECIMALS)
    );

    let mut sim = Simulation::new(config)?;
    let report = sim.run()?;

    tracing::info!(
        rounds = report.rounds_played,
        top_ups = report.top_ups,
        removals = report.removals,
        stalled = report.stalled_tables.len(),
        "Simulation finished"
    );
    for summary in &report.tables {
        log::info!(
            "Table {}: {} round(s), state {}",
            summary.id,
            summary.current_round,
            summary.state
        );
    }

    if let Some(path) = args.snapshot {
        let json = sim.venue().snapshot().to_json()?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
        log::info!("Snapshot written to {}", path.display());
    }

    Ok(())
}
