//! sday - permission set exporter
//!
//! Exports object, field and user permissions from permission sets and
//! permission set groups in a source format project to CSV or XLSX.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

/// sday - permission set exporter
#[derive(Parser, Debug)]
#[command(name = "sday")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SDAY_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    /// Print the result as JSON instead of CSV
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export one permission type of a permission set to CSV or XLSX
    Ps2csv(commands::ExportArgs),

    /// Export one permission type of a permission set group to CSV or XLSX, with
    /// member permission sets merged and muting applied
    Psg2csv(commands::ExportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so CSV on stdout stays clean
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Ps2csv(args) => commands::ps2csv::run(&args, cli.json).await,
        Commands::Psg2csv(args) => commands::psg2csv::run(&args, cli.json).await,
    }
}
