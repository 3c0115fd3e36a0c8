#![deny(unsafe_code)]

mod common;
mod config;
mod configure;
mod constants;
mod daemon;
mod events;
mod tk;
mod wm;

use anyhow::{Result, bail};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "zonedrop")]
#[command(version)]
#[command(about = "Snap dragged windows into configurable drop zones", long_about = None)]
struct Cli {
    /// Run the background daemon (provides the core functionality)
    #[arg(short, long)]
    daemon: bool,

    /// Interactively lay out the drop zones and save them
    #[arg(short, long)]
    configure: bool,

    /// Zone profile to run or configure
    #[arg(short, long, default_value = constants::config::DEFAULT_PROFILE)]
    profile: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    check_requirements()?;
    let cli = Cli::parse();

    if cli.daemon {
        daemon::run(&cli.profile)
    } else if cli.configure {
        configure::run(&cli.profile)
    } else {
        Cli::command().print_help()?;
        Ok(())
    }
}

/// The engine is only glue between external programs; refuse to start when
/// one of them is missing.
fn check_requirements() -> Result<()> {
    let missing: Vec<&str> = constants::commands::REQUIRED
        .iter()
        .copied()
        .filter(|command| !wm::command_exists(command))
        .collect();
    if !missing.is_empty() {
        bail!("missing dependencies: {}", missing.join(", "));
    }
    Ok(())
}
