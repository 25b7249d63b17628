//! Orbit CLI entry point.

mod commands;
mod shell;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use commands::device;

/// Orbit command line interface.
#[derive(Parser, Debug)]
#[command(name = "orbit", version = orbit_cli::ORBIT_VERSION, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage Apple devices registered for ad hoc provisioning.
    Device {
        #[command(subcommand)]
        command: device::DeviceCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::config::HookBuilder::default()
        .display_location_section(false)
        .display_env_section(false)
        .install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Device { command } => match command {
            device::DeviceCommand::List(args) => device::list(args).await,
        },
    }
}
