//! Tread - headless runner for the third-person controller
//!
//! Usage:
//!   tread run <scenario.toml> [--config <controller.toml>] [--dt 0.0166] [--json]
//!   tread config
//!   tread check <controller.toml>

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tread_player::{ControllerConfig, RunOptions, RunReport, Scenario, ScenarioRunner};

#[derive(Parser)]
#[command(name = "tread")]
#[command(about = "Third-person character controller - scripted headless runs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a scenario and print what the avatar did
    Run {
        /// Path to scenario file
        scenario: PathBuf,

        /// Controller config file (defaults are used when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Frame time in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f64,

        /// Seconds to simulate, overriding the scenario's duration
        #[arg(long)]
        seconds: Option<f64>,

        /// Record the avatar state every N frames
        #[arg(long)]
        trace_every: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default controller config as TOML
    Config,

    /// Validate a controller config file
    Check {
        /// Path to controller config
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            config,
            dt,
            seconds,
            trace_every,
            json,
        } => {
            let config = match config {
                Some(path) => ControllerConfig::load(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => ControllerConfig::default(),
            };
            let scenario = Scenario::load(&scenario)
                .with_context(|| format!("Failed to load scenario {}", scenario.display()))?;

            let options = RunOptions {
                dt,
                seconds,
                trace_every,
            };
            let report = ScenarioRunner::new(&scenario, &config)
                .context("Failed to set up scenario")?
                .run(&options)
                .context("Scenario run failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Config => {
            print!("{}", ControllerConfig::default().to_toml_string()?);
        }
        Commands::Check { config } => {
            ControllerConfig::load(&config)
                .with_context(|| format!("Invalid config {}", config.display()))?;
            println!("{}: ok", config.display());
        }
    }

    Ok(())
}

fn print_report(report: &RunReport) {
    println!("Scenario: {}", report.scenario);
    println!("Frames:   {} ({:.2}s)", report.frames, report.seconds);
    println!();

    for sample in &report.trace {
        let s = &sample.state;
        println!(
            "  [{:>5}] pos ({:>7.2}, {:>6.2}, {:>7.2})  h {:>7.1}  cam h {:>7.1} p {:>5.1}  {:?} {}",
            sample.frame,
            s.position.x,
            s.position.y,
            s.position.z,
            s.heading,
            s.camera_heading,
            s.camera_pitch,
            s.gait,
            s.animation,
        );
    }
    if !report.trace.is_empty() {
        println!();
    }

    println!("Events:");
    for e in &report.events {
        println!("  [{:>5}] {:>6.2}s  {:?}", e.frame, e.time, e.event);
    }
    println!();

    let s = &report.final_state;
    println!("Final state:");
    println!(
        "  position  ({:.2}, {:.2}, {:.2})",
        s.position.x, s.position.y, s.position.z
    );
    println!("  heading   {:.1}", s.heading);
    println!("  grounded  {}", s.grounded);
    println!("  gait      {:?}", s.gait);
    println!("  camera    heading {:.1} pitch {:.1}", s.camera_heading, s.camera_pitch);
    for layer in &s.layers {
        println!(
            "  clip      {:<8} weight {:.2} time {:.2}",
            layer.clip, layer.weight, layer.time
        );
    }
}
