use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use gp_core::StageRole;
use gp_path::{GasPath, PathError, run_sweep};
use gp_project::{Condition, PathReport, ProjectResult};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gp-cli")]
#[command(about = "gaspath CLI - impulse facility gas path calculations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a facility condition and print its states
    Run {
        /// Path to the condition YAML file
        config_path: PathBuf,
        /// Override a parameter (repeatable), e.g. --set p1=3000
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the stage sequence without evaluating it
    Topology {
        /// Path to the condition YAML file
        config_path: PathBuf,
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
    },
    /// Evaluate one independent condition per value of a parameter
    Sweep {
        /// Path to the condition YAML file
        config_path: PathBuf,
        /// Parameter to vary (e.g. p1)
        #[arg(long)]
        parameter: String,
        /// Comma-separated values
        #[arg(long, value_delimiter = ',', required = true)]
        values: Vec<String>,
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
    },
}

fn main() -> ProjectResult<()> {
    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config_path,
            overrides,
            json,
        } => cmd_run(&config_path, &overrides, json),
        Commands::Topology {
            config_path,
            overrides,
        } => cmd_topology(&config_path, &overrides),
        Commands::Sweep {
            config_path,
            parameter,
            values,
            overrides,
        } => cmd_sweep(&config_path, &overrides, &parameter, &values),
    }
}

fn cmd_run(config_path: &Path, overrides: &[String], json: bool) -> ProjectResult<()> {
    let condition = Condition::load(Some(config_path), overrides)?;
    let config = condition.facility_config()?;
    let model = condition.gas_model()?;

    let start = Instant::now();
    let path = GasPath::evaluate(&config, model.as_ref())?;
    let elapsed = start.elapsed().as_secs_f64();

    let report = PathReport::from_path(&path);
    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!("Facility type: {}", report.facility_type);
    println!("Calculation mode: {}", config.mode);
    for stage in &report.stages {
        println!("  {} ({} -> {})", stage.role, stage.entrance, stage.exit);
        for output in &stage.outputs {
            println!("    {} = {:.4} {}", output.name, output.value, output.unit);
        }
    }
    println!();
    print!("{}", report.state_table());
    println!("\nSolved in {:.3}s", elapsed);
    Ok(())
}

fn cmd_topology(config_path: &Path, overrides: &[String]) -> ProjectResult<()> {
    let condition = Condition::load(Some(config_path), overrides)?;
    let topology = condition.topology()?;
    let flags = topology.flags();

    println!(
        "Facility type: {} (secondary driver: {}, nozzle: {})",
        flags.facility_type, flags.secondary_driver, flags.nozzle
    );
    for (i, role) in topology.roles().iter().enumerate() {
        println!("  {:>2}. {}", i + 1, role);
    }
    Ok(())
}

fn cmd_sweep(
    config_path: &Path,
    overrides: &[String],
    parameter: &str,
    values: &[String],
) -> ProjectResult<()> {
    let condition = Condition::load(Some(config_path), overrides)?;
    let model = condition.gas_model()?;

    println!("Sweeping {} over {} values", parameter, values.len());
    let start = Instant::now();
    let points = run_sweep(
        values,
        |value| {
            condition
                .with_override(parameter, value)
                .and_then(|c| c.facility_config())
                .map_err(PathError::from)
        },
        model.as_ref(),
    );

    println!(
        "{:>14} {:>12} {:>12} {:>12} {:>12}",
        parameter, "vs1 (m/s)", "vs2 (m/s)", "p (Pa)", "T (K)"
    );
    let mut failures = 0;
    for point in &points {
        match &point.result {
            Ok(path) => {
                let speed = |role| {
                    path.shock_speed(role)
                        .map(|v| format!("{:.1}", v.value))
                        .unwrap_or_else(|| "-".to_string())
                };
                let (p, t) = path
                    .exit_state()
                    .map(|s| (s.state.pressure().value, s.state.temperature().value))
                    .unwrap_or((f64::NAN, f64::NAN));
                println!(
                    "{:>14} {:>12} {:>12} {:>12.4e} {:>12.1}",
                    point.value,
                    speed(StageRole::ShockTube),
                    speed(StageRole::AccelerationTube),
                    p,
                    t
                );
            }
            Err(e) => {
                failures += 1;
                println!("{:>14} failed: {}", point.value, e);
            }
        }
    }
    println!(
        "\n{} of {} points solved in {:.3}s",
        points.len() - failures,
        points.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
