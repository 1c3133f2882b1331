//! Cards CLI - Command line tool for card grid carousels.
//!
//! Commands:
//! - `cards inspect` - Show how each container would be mounted
//! - `cards simulate` - Replay a carousel timeline on a virtual clock
//! - `cards run` - Drive carousels in real time from stdin events
//! - `cards config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ConfigArgs, InspectArgs, RunArgs, SimulateArgs};

/// Cards CLI - Inspect, simulate and drive card carousels
#[derive(Parser)]
#[command(name = "cards")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show slider settings and mount outcome per container
    Inspect(InspectArgs),

    /// Simulate carousel moves on a virtual clock
    Simulate(SimulateArgs),

    /// Drive carousels in real time, reading events from stdin
    Run(RunArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    logging::init(&ctx.config.logging, cli.verbose);
    if let Some(ref path) = ctx.config_path {
        ctx.output.debug(&format!("Using config {}", path.display()));
    }

    // Execute command
    let result = match cli.command {
        Commands::Inspect(args) => commands::inspect::run(args, &ctx).await,
        Commands::Simulate(args) => commands::simulate::run(args, &ctx).await,
        Commands::Run(args) => commands::run::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
