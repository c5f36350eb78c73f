//! Memo CLI
//!
//! Two hook commands (`check`, `store`) speak the agent runtime's
//! stdin/stdout JSON contract and always exit zero; the rest maintain the
//! persisted store. Logging goes to stderr so the protocol channel stays
//! clean.

mod args;
mod commands;

use clap::Parser;

pub use args::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controls verbosity; stdout is reserved for hook responses
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::route(cli).await
}
