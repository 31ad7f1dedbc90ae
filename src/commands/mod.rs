pub mod balance;

use anyhow::Result;

use crate::cli::{BalanceArgs, RunArgs};
use crate::config::RunConfig;

/// `nettonull run <config.json>`
pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = RunConfig::from_json_file(&args.config)?;
    config.force |= args.force;
    tracing::debug!("[commands] config {} -> {:?}", args.config.display(), config);
    balance::run(&config)
}

/// `nettonull balance ...`
pub fn balance(args: &BalanceArgs) -> Result<()> {
    balance::run(&args.to_config())
}
