mod commands;
mod logging;
mod progress;

use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use notizen_core::{AppConfig, NoteEngine};
use progress::CliReporter;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let mut config = match notizen_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();
    args.overrides.apply(&mut config);

    match args.command {
        Some(Commands::Build) => {
            if let Err(err) = run_build(config) {
                error!("Error: {:#}", err);
                process::exit(1);
            }
        }
        Some(Commands::Organize) => {
            if let Err(err) = run_organize(config) {
                error!("Error: {:#}", err);
                process::exit(1);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
        }
        None => {
            Cli::command()
                .print_long_help()
                .context("printing help")?;
        }
    }

    Ok(())
}

fn run_build(config: AppConfig) -> anyhow::Result<()> {
    let engine = NoteEngine::new(config);
    let reporter = CliReporter::new();
    let result = engine.run(&reporter).context("build failed")?;

    println!();
    info!(
        "Organize: {}, Compile: {}, Index: {}",
        format!("{:.2}s", result.relocate_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.compile_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.index_duration.as_secs_f64()).green(),
    );
    info!(
        "{} notes ({} moved), {} other files, {} compiled",
        format!("{}", result.notes).cyan(),
        format!("{}", result.moved).cyan(),
        format!("{}", result.others).cyan(),
        format!("{}", result.compiled).green(),
    );
    for failure in &result.failures {
        info!(
            "{} {}",
            "failed:".red(),
            failure.source.display()
        );
    }
    info!("Index written to {}", result.index_path.display());

    Ok(())
}

fn run_organize(config: AppConfig) -> anyhow::Result<()> {
    let engine = NoteEngine::new(config);
    let reporter = CliReporter::new();
    let relocation = engine.organize(&reporter).context("organize failed")?;

    info!(
        "{} notes ({} moved), {} other files",
        format!("{}", relocation.notes.len()).cyan(),
        format!("{}", relocation.moved).cyan(),
        format!("{}", relocation.others.len()).cyan(),
    );

    Ok(())
}
