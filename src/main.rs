use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nettonull::cli::{Cli, Commands};
use nettonull::commands;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match &cli.command {
        Commands::Run(args) => commands::run(args),
        Commands::Balance(args) => commands::balance(args),
    }
}
