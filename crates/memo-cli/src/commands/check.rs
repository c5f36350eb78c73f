//! Pre-call check: answer whether the runtime may skip a tool call

use anyhow::Result;
use memo_core::{CacheConfig, CacheEngine, CheckOutput, HookInput};

pub async fn run(config: CacheConfig) -> Result<()> {
    let raw = super::read_stdin().await;
    println!("{}", handle(&raw, config).await);
    Ok(())
}

/// Produce the response for one pre-call request
///
/// Never fails: malformed input, an unopenable store, or any internal
/// error all answer `{}` so the runtime proceeds normally.
pub(crate) async fn handle(raw: &str, config: CacheConfig) -> String {
    let output = match serde_json::from_str::<HookInput>(raw) {
        Ok(input) => check(input, config).await,
        Err(e) => {
            tracing::debug!("malformed check request: {e}");
            CheckOutput::miss()
        }
    };
    serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
}

async fn check(input: HookInput, config: CacheConfig) -> CheckOutput {
    let engine = match CacheEngine::open(config) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::warn!("cache unavailable: {e}");
            return CheckOutput::miss();
        }
    };
    match engine.check(&input.tool_name, &input.tool_input).await {
        Some(hit) => {
            tracing::debug!(
                session = %input.session_id,
                tool = %input.tool_name,
                "answering from cache"
            );
            CheckOutput::hit(&hit)
        }
        None => CheckOutput::miss(),
    }
}
