//! Headless host for the termite colony simulation.

mod render;
mod telemetry;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use termite_core::{DropJump, EvolutionRule, SimulationConfig};
use termite_world::Simulation;
use tracing::info;

#[derive(Parser)]
#[command(name = "termites")]
#[command(author, version, about = "Termites gathering wood chips on a toroidal grid", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the colony and print the final world
    Run(RunArgs),

    /// Print the default configuration as JSON
    Config,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Configuration file (.json or .toml); flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<i32>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<i32>,

    /// Number of termites
    #[arg(short = 'n', long)]
    termites: Option<usize>,

    /// Initial chip probability per cell (0.0 to 1.0)
    #[arg(short, long)]
    density: Option<f32>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Evolution rule: 1, 2 or 3
    #[arg(short, long)]
    rule: Option<u8>,

    /// Where rule 3 sends a termite after it drops a chip
    #[arg(long, value_enum)]
    jump: Option<JumpArg>,

    /// Number of generations to run
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Print a frame every N generations (0 prints only the final frame)
    #[arg(long, default_value = "0")]
    render_every: u64,

    /// Print the final snapshot as JSON instead of a text frame
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum JumpArg {
    /// One step in a random direction
    Step,
    /// Anywhere on a chip-free cell
    Empty,
}

impl From<JumpArg> for DropJump {
    fn from(arg: JumpArg) -> Self {
        match arg {
            JumpArg::Step => DropJump::RandomStep,
            JumpArg::Empty => DropJump::EmptyCell,
        }
    }
}

impl RunArgs {
    fn into_config(self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => SimulationConfig::default(),
        };

        if let Some(width) = self.width {
            config.world.width = width;
        }
        if let Some(height) = self.height {
            config.world.height = height;
        }
        if let Some(termites) = self.termites {
            config.world.termites = termites;
        }
        if let Some(density) = self.density {
            config.world.density = density;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(number) = self.rule {
            config.rule = EvolutionRule::from_number(number)
                .ok_or_else(|| anyhow!("unknown rule {number}, expected 1, 2 or 3"))?;
        }
        if let Some(jump) = self.jump {
            config.drop_jump = jump.into();
        }
        if let Some(ticks) = self.ticks {
            config.ticks = ticks;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_telemetry(cli.log_json)?;

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&SimulationConfig::default())?);
            Ok(())
        }
    }
}

fn run(args: RunArgs) -> Result<()> {
    let render_every = args.render_every;
    let json = args.json;
    let config = args.into_config()?;
    let ticks = config.ticks;
    let density = config.world.density;

    info!(
        "Starting termites: {}x{} grid, {} termites, {}",
        config.world.width, config.world.height, config.world.termites, config.rule
    );

    let mut sim = Simulation::new(config)?;

    if render_every == 0 {
        sim.run(ticks);
    } else {
        // Step, then render, strictly in turn: frames never see a half-updated world.
        for _ in 0..ticks {
            sim.step();
            if sim.generation() % render_every == 0 {
                print_frame(&sim, density);
            }
        }
        let stats = sim.stats();
        info!(
            rule = %sim.rule(),
            generation = stats.generation,
            chips_on_grid = stats.chips_on_grid,
            chips_carried = stats.chips_carried,
            clustering = format!("{:.3}", stats.clustering),
            "Run complete"
        );
    }

    if json {
        println!("{}", sim.snapshot().to_json()?);
    } else if needs_final_frame(ticks, render_every) {
        print_frame(&sim, density);
    }

    Ok(())
}

/// True unless the periodic frames already ended on the last generation.
fn needs_final_frame(ticks: u64, render_every: u64) -> bool {
    render_every == 0 || ticks == 0 || ticks % render_every != 0
}

fn print_frame(sim: &Simulation, density: f32) {
    let snapshot = sim.snapshot();
    print!("{}", render::render_frame(&snapshot));
    println!("{}", render::render_caption(&snapshot, density));
}
