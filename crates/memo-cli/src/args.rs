//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "memo")]
#[command(about = "Tool-call result cache for agent runtimes")]
#[command(long_about = r#"Tool-call result cache for agent runtimes

The runtime invokes `memo check` before a tool call and `memo store`
after it. Both read one JSON object from stdin, write one JSON object to
stdout, and exit zero no matter what: a caching problem must never fail
the surrounding tool call.

RUNTIME HOOKS:
  memo check < pre_call.json     # {} = proceed, otherwise a skip decision
  memo store < post_call.json    # always {}

MAINTENANCE:
  memo stats                     # diagnostic snapshot of the store
  memo evict                     # drop entries past their TTL
  memo clear                     # drop everything"#)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pre-call lookup: may the runtime skip this tool call?
    Check,

    /// Post-call bookkeeping: store the fresh result or invalidate stale entries
    Store,

    /// Print a diagnostic snapshot of the persisted store
    Stats,

    /// Remove entries past their TTL
    Evict,

    /// Remove all cached entries
    Clear,
}
