use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

use divider_calc::*;

#[derive(Parser)]
#[command(name = "divider-calc")]
#[command(about = "Search resistor values for a two button voltage divider ladder", long_about = None)]
struct Cli {
    /// YAML config file, defaults are used for anything it leaves out
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Standard series name (E3, E6, E12, E24) or comma separated base values
    #[arg(long)]
    series: Option<String>,
    /// Relative tolerance below which candidate values count as duplicates
    #[arg(short, long)]
    tolerance: Option<f64>,
    /// Supply voltage in volts
    #[arg(long)]
    ucc: Option<f64>,
    /// Maximum power loss per resistor in mW
    #[arg(long)]
    max_power: Option<f64>,
    /// Target voltages for idle, button 1, button 2 and both buttons
    #[arg(long, value_parser = parse_targets)]
    targets: Option<[f64; 4]>,
    #[arg(long, value_enum)]
    objective: Option<ObjectiveArg>,
    #[arg(long, value_enum)]
    node: Option<NodeArg>,
    #[arg(long, value_enum)]
    wiring: Option<WiringArg>,
    /// Run the search on a single thread
    #[arg(long)]
    sequential: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ObjectiveArg {
    Squared,
    Absolute,
}

#[derive(Clone, Copy, ValueEnum)]
enum NodeArg {
    AcrossR0,
    AcrossSwitches,
}

#[derive(Clone, Copy, ValueEnum)]
enum WiringArg {
    Straight,
    Crossed,
}

fn parse_targets(arg: &str) -> std::result::Result<[f64; 4], String> {
    let values = arg
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("{}: {}", v, e)))
        .collect::<std::result::Result<Vec<f64>, String>>()?;
    let mut targets = [0.0; 4];
    if values.len() != targets.len() {
        return Err(format!("expected 4 comma separated voltages, got {}", values.len()));
    }
    targets.copy_from_slice(&values);
    Ok(targets)
}

fn parse_series(arg: &str) -> SeriesSpec {
    let values: std::result::Result<Vec<f64>, _> =
        arg.split(',').map(|v| v.trim().parse::<f64>()).collect();
    match values {
        Ok(values) => SeriesSpec::Values(values),
        Err(_) => SeriesSpec::Named(arg.to_string()),
    }
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(series) = &cli.series {
        config.series = parse_series(series);
    }
    if let Some(tolerance) = cli.tolerance {
        config.tolerance = tolerance;
    }
    if let Some(ucc) = cli.ucc {
        config.ucc = ucc;
    }
    if let Some(max_power) = cli.max_power {
        config.max_power_loss_mw = max_power;
    }
    if let Some(targets) = cli.targets {
        config.targets = targets;
    }
    if let Some(objective) = cli.objective {
        config.objective = match objective {
            ObjectiveArg::Squared => Objective::Squared,
            ObjectiveArg::Absolute => Objective::Absolute,
        };
    }
    if let Some(node) = cli.node {
        config.node = match node {
            NodeArg::AcrossR0 => MeasuredNode::AcrossR0,
            NodeArg::AcrossSwitches => MeasuredNode::AcrossSwitches,
        };
    }
    if let Some(wiring) = cli.wiring {
        config.wiring = match wiring {
            WiringArg::Straight => Wiring::Straight,
            WiringArg::Crossed => Wiring::Crossed,
        };
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let candidates = config.candidates()?;
    let mut optimizer = config.optimizer()?;
    if cli.sequential {
        optimizer = optimizer.sequential();
    }

    println!("Number of candidate values: {}", candidates.len());
    println!("Number of iterations: {:.2e}", optimizer.iterations(&candidates) as f64);

    match optimizer.search(&candidates) {
        Some(best) => println!("{}", best),
        None => println!("No matching combination found!"),
    }
    Ok(())
}
