//! Command routing and handlers

mod check;
mod maintenance;
mod store;

use crate::args::{Cli, Commands};
use anyhow::Result;
use memo_core::CacheConfig;

/// Dispatch a parsed command line
pub async fn route(cli: Cli) -> Result<()> {
    let config = CacheConfig::load(cli.config.as_deref());
    match cli.command {
        Commands::Check => check::run(config).await,
        Commands::Store => store::run(config).await,
        Commands::Stats => maintenance::stats(config).await,
        Commands::Evict => maintenance::evict(config).await,
        Commands::Clear => maintenance::clear(config).await,
    }
}

/// Read the single JSON request from stdin
pub(crate) async fn read_stdin() -> String {
    use tokio::io::AsyncReadExt;

    let mut buf = String::new();
    if let Err(e) = tokio::io::stdin().read_to_string(&mut buf).await {
        tracing::warn!("failed to read stdin: {e}");
    }
    buf
}
