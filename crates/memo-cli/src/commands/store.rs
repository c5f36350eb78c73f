//! Post-call store: persist the fresh result or invalidate stale entries

use anyhow::Result;
use memo_core::{CacheConfig, CacheEngine, HookInput};

pub async fn run(config: CacheConfig) -> Result<()> {
    let raw = super::read_stdin().await;
    println!("{}", handle(&raw, config).await);
    Ok(())
}

/// Process one post-call request
///
/// The answer is always `{}`: this phase is purely a side effect and
/// never alters the already-completed call.
pub(crate) async fn handle(raw: &str, config: CacheConfig) -> String {
    match serde_json::from_str::<HookInput>(raw) {
        Ok(input) => record(input, config).await,
        Err(e) => tracing::debug!("malformed store request: {e}"),
    }
    "{}".to_string()
}

async fn record(input: HookInput, config: CacheConfig) {
    let engine = match CacheEngine::open(config) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::warn!("cache unavailable: {e}");
            return;
        }
    };
    let is_error = input.result_is_error();
    let result = input.tool_result.unwrap_or(serde_json::Value::Null);
    engine
        .record(
            &input.tool_name,
            &input.tool_input,
            &result,
            is_error,
            input.cwd.as_deref(),
        )
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> CacheConfig {
        CacheConfig {
            cache_dir: dir.path().join("cache"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_always_answers_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let ok = serde_json::to_string(
            &HookInput::new("Read", json!({"file_path": "/a.txt"}))
                .with_tool_result(json!("hello")),
        )
        .unwrap();

        assert_eq!(handle(&ok, test_config(&dir)).await, "{}");
        assert_eq!(handle("garbage", test_config(&dir)).await, "{}");
        assert_eq!(handle("{}", test_config(&dir)).await, "{}");
    }

    #[tokio::test]
    async fn test_error_results_leave_no_entry() {
        let dir = tempfile::tempdir().unwrap();
        let failed = serde_json::to_string(
            &HookInput::new("Read", json!({"file_path": "/a.txt"}))
                .with_tool_result(json!({"error": "no such file"})),
        )
        .unwrap();

        handle(&failed, test_config(&dir)).await;

        let pre = serde_json::to_string(&HookInput::new(
            "Read",
            json!({"file_path": "/a.txt"}),
        ))
        .unwrap();
        assert_eq!(
            crate::commands::check::handle(&pre, test_config(&dir)).await,
            "{}"
        );
    }

    #[tokio::test]
    async fn test_mutation_invalidates_prior_entry() {
        let dir = tempfile::tempdir().unwrap();
        let read_post = serde_json::to_string(
            &HookInput::new("Read", json!({"file_path": "/a.txt"}))
                .with_tool_result(json!("hello")),
        )
        .unwrap();
        let write_post = serde_json::to_string(
            &HookInput::new("Write", json!({"file_path": "/a.txt", "content": "new"}))
                .with_tool_result(json!("File written")),
        )
        .unwrap();
        let pre = serde_json::to_string(&HookInput::new(
            "Read",
            json!({"file_path": "/a.txt"}),
        ))
        .unwrap();

        handle(&read_post, test_config(&dir)).await;
        assert_ne!(
            crate::commands::check::handle(&pre, test_config(&dir)).await,
            "{}"
        );

        handle(&write_post, test_config(&dir)).await;
        assert_eq!(
            crate::commands::check::handle(&pre, test_config(&dir)).await,
            "{}"
        );
    }
}
