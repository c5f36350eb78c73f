//! Hook request payload

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One request from the agent runtime
///
/// The pre-call check carries `tool_name` and `tool_input`; the post-call
/// store additionally carries `tool_result`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HookInput {
    #[serde(default)]
    pub session_id: String,
    /// Directory relative tool paths are resolved against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: serde_json::Value,
    /// Present only on the post-call store request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<serde_json::Value>,
    /// Error flag reported by the runtime, when it reports one
    #[serde(default)]
    pub is_error: bool,
}

impl HookInput {
    /// Create a new request for a tool
    pub fn new(tool_name: impl Into<String>, tool_input: serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_input,
            ..Default::default()
        }
    }

    /// Set the session id
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Set the working directory
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Set the tool result
    pub fn with_tool_result(mut self, tool_result: serde_json::Value) -> Self {
        self.tool_result = Some(tool_result);
        self
    }

    /// Whether the executed call failed
    ///
    /// Runtimes differ: some send a top-level flag, some embed it in the
    /// result object. Anything that looks like a failure counts as one;
    /// a failure wrongly cached is worse than one wrongly skipped.
    pub fn result_is_error(&self) -> bool {
        if self.is_error {
            return true;
        }
        match &self.tool_result {
            Some(serde_json::Value::Object(map)) => {
                map.get("is_error").and_then(serde_json::Value::as_bool) == Some(true)
                    || map.get("success").and_then(serde_json::Value::as_bool) == Some(false)
                    || map.contains_key("error")
            }
            _ => false,
        }
    }
}
