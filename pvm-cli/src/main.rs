//! pvm: exact significance statistics for spontaneous reporting data.
//!
//! CLI entry point using clap for argument parsing.

mod commands;
mod report_file;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pvm",
    version,
    about = "Exact drug-event association statistics for spontaneous reports",
    long_about = "Aggregates raw spontaneous adverse-event reports into 2x2 \
                  contingency tables and computes exact (and mid-p corrected) \
                  significance probabilities under the hypergeometric null."
)]
struct Cli {
    /// Number of threads to use
    #[arg(long, default_value = "1", global = true)]
    threads: usize,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a raw report matrix into 2x2 contingency tables
    Tables(commands::tables::TablesArgs),

    /// Aggregate and compute exact / mid-p significance per drug-event pair
    Test(commands::test::TestArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    // Set up thread pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build_global()
        .ok();

    tracing::info!("pvm v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Using {} threads", cli.threads);

    match cli.command {
        Commands::Tables(args) => commands::tables::run(args),
        Commands::Test(args) => commands::test::run(args),
    }
}
