//! nav-sim - run one navigation scenario from the command line
//!
//! ```text
//! nav-sim                                  # default 100x80 scenario, headless
//! nav-sim --config scenario.toml --render  # draw every tick to stdout
//! nav-sim --seed 7 --density 0.3 --goal 90,70
//! ```
//!
//! The run summary is printed as JSON. The exit code is non-zero unless the
//! agent reached the goal. Logging goes to stderr and honours `RUST_LOG`.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use grid_spatial::CellCoord;
use nav_sim::{NullPresentation, ScenarioConfig, TerminalPresentation, run_scenario};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Incremental replanning through a partially observed grid
#[derive(Parser)]
#[command(name = "nav-sim")]
#[command(about = "Drive a D* Lite agent through a random grid world", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario file (TOML); command-line options override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Seed for world generation
    #[arg(long)]
    seed: Option<u64>,

    /// Probability that a cell is an obstacle
    #[arg(long)]
    density: Option<f64>,

    /// Sensor radius in cells
    #[arg(long)]
    view_range: Option<u32>,

    /// Start cell as `x,y`
    #[arg(long, value_parser = parse_cell)]
    start: Option<CellCoord>,

    /// Goal cell as `x,y`
    #[arg(long, value_parser = parse_cell)]
    goal: Option<CellCoord>,

    /// Draw the sensed map to stdout
    #[arg(long)]
    render: bool,

    /// With --render, draw only every Nth tick
    #[arg(long, default_value_t = 1)]
    every: usize,

    /// Pretty-print the summary
    #[arg(long)]
    pretty: bool,
}

fn parse_cell(s: &str) -> std::result::Result<CellCoord, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in `{s}`: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in `{s}`: {e}"))?;
    Ok(CellCoord::new(x, y))
}

impl Cli {
    fn scenario(&self) -> Result<ScenarioConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading scenario from {}", path.display());
                ScenarioConfig::load(path)
                    .with_context(|| format!("loading {}", path.display()))?
            }
            None => ScenarioConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(density) = self.density {
            config.obstacle_density = density;
        }
        if let Some(view_range) = self.view_range {
            config.view_range = view_range;
        }
        if let Some(start) = self.start {
            config.start = start;
        }
        if let Some(goal) = self.goal {
            config.goal = goal;
        }

        let issues = config.validate();
        if !issues.is_empty() {
            bail!("invalid scenario:\n  {}", issues.join("\n  "));
        }
        Ok(config)
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nav_sim=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.scenario()?;
    info!(
        width = config.width,
        height = config.height,
        seed = config.seed,
        "nav-sim v{}",
        env!("CARGO_PKG_VERSION")
    );

    let summary = if cli.render {
        run_scenario(&config, TerminalPresentation::new(io::stdout().lock()).every(cli.every))?
    } else {
        run_scenario(&config, NullPresentation)?
    };

    let json = if cli.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{json}");

    Ok(if summary.reached() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
