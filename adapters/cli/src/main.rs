#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Forbidden Island session.

mod config;
mod map;
mod script;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use forbidden_island_core::{Outcome, SimulationConfig, TerrainStrategy};
use forbidden_island_world::{query, World};

use crate::session::Session;

/// Terrain generator selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Pyramid,
    Random,
    Fractal,
}

impl From<Mode> for TerrainStrategy {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Pyramid => Self::Pyramid,
            Mode::Random => Self::Random,
            Mode::Fractal => Self::Fractal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "forbidden-island")]
#[command(about = "Collect the pieces and escape the rising ocean", long_about = None)]
struct Args {
    /// Terrain generator for the starting island.
    #[arg(long, value_enum, default_value_t = Mode::Fractal)]
    mode: Mode,

    /// Seed for terrain and placement.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Maximum number of session steps; each step consumes one script token.
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Key presses separated by spaces or commas (up, down, left, right, wait, p, m, r, t).
    #[arg(long, default_value = "")]
    script: String,

    /// TOML file overriding the default simulation constants.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Island size; the grid spans one more cell per side.
    #[arg(long)]
    island_size: Option<u32>,

    /// Ticks between water rises.
    #[arg(long)]
    cadence: Option<u32>,

    /// Print the final island as ASCII.
    #[arg(long, default_value_t = false)]
    map: bool,

    /// Enable debug logging.
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn simulation_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => config::load(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(island_size) = self.island_size {
            config.island_size = island_size;
        }
        if let Some(cadence) = self.cadence {
            config.flood_cadence = cadence;
        }
        config.validate().context("invalid simulation configuration")?;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Entry point for the Forbidden Island command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.simulation_config()?;
    let tokens = script::parse(&args.script).context("invalid --script")?;
    let world = World::try_new(config, args.mode.into(), args.seed)?;
    println!("{}", query::welcome_banner(&world));

    let mut session = Session::new(world);
    session.run(&tokens, args.ticks);

    let world = session.world();
    let summary = session.summary();
    match query::outcome(world) {
        Outcome::Won { score } => println!("You escaped! Score: {score}"),
        Outcome::Lost => println!("You drowned."),
        Outcome::InProgress if session.is_paused() => println!("Session ended while paused."),
        Outcome::InProgress => println!("Out of time."),
    }
    println!(
        "steps: {}  ticks: {}  water level: {}  rises: {}  cells flooded: {}  items: {}/{}",
        session.steps(),
        summary.ticks(),
        query::water_level(world),
        summary.rises(),
        summary.cells_flooded(),
        query::inventory(world).len(),
        query::config(world).inventory_to_win,
    );
    log::debug!("{} flood reports published", session.reports().len());

    if args.map {
        print!("{}", map::render(world));
    }
    Ok(())
}
