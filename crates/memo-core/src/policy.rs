//! Per-tool caching policy
//!
//! The registry is a static table: tool name in, policy out. It is built
//! into the binary and never mutated at runtime. Unknown tools fail
//! closed (never cached, never invalidating) because caching a tool
//! whose side effects are unknown is unsafe.

use std::time::Duration;

/// How a cached entry is tied to the filesystem for invalidation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationScope {
    /// Identity includes concrete paths; mutating one of them drops the entry
    File,
    /// Any relevant mutation drops the tool's entire cached output
    Global,
}

/// Static caching policy for one tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolPolicy {
    /// Whether successful results may be reused within the TTL
    pub cacheable: bool,
    /// Default time-to-live for cached results
    pub ttl: Duration,
    /// Invalidation scope for cached results
    pub scope: InvalidationScope,
    /// Tools whose cached entries a call to this tool forces out
    pub invalidates: &'static [&'static str],
}

/// Read tools whose entries a file mutation forces out
const MUTATION_TARGETS: &[&str] = &["Read", "Glob", "Grep"];

/// Every tool the registry has an explicit row for
pub const KNOWN_TOOLS: &[&str] = &[
    "Read",
    "Glob",
    "Grep",
    "WebFetch",
    "WebSearch",
    "Write",
    "Edit",
    "MultiEdit",
    "NotebookEdit",
    "Bash",
    "Task",
    "TodoWrite",
];

impl ToolPolicy {
    /// Look up the policy for a tool name
    pub fn for_tool(tool_name: &str) -> Self {
        match tool_name {
            // Read-only tools: results are reusable until a mutation or
            // the TTL says otherwise.
            "Read" => Self::read_only(Duration::from_secs(30), InvalidationScope::File),
            "Glob" | "Grep" => Self::read_only(Duration::from_secs(60), InvalidationScope::Global),
            // Web results have no file dependency; only the TTL ages them out.
            "WebFetch" => Self::read_only(Duration::from_secs(300), InvalidationScope::Global),
            "WebSearch" => Self::read_only(Duration::from_secs(600), InvalidationScope::Global),
            // File mutations: never cached, and stale read results must go.
            "Write" | "Edit" | "MultiEdit" | "NotebookEdit" => Self::mutating(MUTATION_TARGETS),
            // Opaque side effects the cache cannot see through: neither
            // cached nor invalidating. Unknown tools land here too.
            _ => Self::none(),
        }
    }

    const fn read_only(ttl: Duration, scope: InvalidationScope) -> Self {
        Self {
            cacheable: true,
            ttl,
            scope,
            invalidates: &[],
        }
    }

    const fn mutating(invalidates: &'static [&'static str]) -> Self {
        Self {
            cacheable: false,
            ttl: Duration::ZERO,
            scope: InvalidationScope::Global,
            invalidates,
        }
    }

    /// The fail-closed default: not cacheable, no invalidation effect
    pub const fn none() -> Self {
        Self {
            cacheable: false,
            ttl: Duration::ZERO,
            scope: InvalidationScope::Global,
            invalidates: &[],
        }
    }

    /// Inverse view: known tools whose calls force this tool's entries out.
    /// Informational; invalidation is driven by the forward `invalidates` sets.
    pub fn invalidated_by(tool_name: &str) -> Vec<&'static str> {
        KNOWN_TOOLS
            .iter()
            .filter(|t| Self::for_tool(t).invalidates.contains(&tool_name))
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_tools_cacheable() {
        for tool in ["Read", "Glob", "Grep", "WebFetch", "WebSearch"] {
            let policy = ToolPolicy::for_tool(tool);
            assert!(policy.cacheable, "{tool} should be cacheable");
            assert!(policy.ttl > Duration::ZERO);
            assert!(policy.invalidates.is_empty());
        }
    }

    #[test]
    fn test_mutating_tools_invalidate() {
        for tool in ["Write", "Edit", "MultiEdit", "NotebookEdit"] {
            let policy = ToolPolicy::for_tool(tool);
            assert!(!policy.cacheable, "{tool} must not be cacheable");
            assert_eq!(policy.invalidates, MUTATION_TARGETS);
        }
    }

    #[test]
    fn test_side_effecting_tools_inert() {
        for tool in ["Bash", "Task", "TodoWrite"] {
            let policy = ToolPolicy::for_tool(tool);
            assert!(!policy.cacheable);
            assert!(policy.invalidates.is_empty());
        }
    }

    #[test]
    fn test_unknown_tool_fails_closed() {
        let policy = ToolPolicy::for_tool("SomeNewTool");
        assert!(!policy.cacheable);
        assert!(policy.invalidates.is_empty());
        assert_eq!(policy, ToolPolicy::none());
    }

    #[test]
    fn test_scopes() {
        assert_eq!(ToolPolicy::for_tool("Read").scope, InvalidationScope::File);
        assert_eq!(ToolPolicy::for_tool("Glob").scope, InvalidationScope::Global);
        assert_eq!(ToolPolicy::for_tool("Grep").scope, InvalidationScope::Global);
    }

    #[test]
    fn test_ttl_ordering() {
        // File reads go stale fastest; web search results last longest.
        let read = ToolPolicy::for_tool("Read").ttl;
        let grep = ToolPolicy::for_tool("Grep").ttl;
        let search = ToolPolicy::for_tool("WebSearch").ttl;
        assert!(read < grep);
        assert!(grep < search);
    }

    #[test]
    fn test_invalidated_by_inverse_view() {
        let invalidators = ToolPolicy::invalidated_by("Read");
        assert!(invalidators.contains(&"Write"));
        assert!(invalidators.contains(&"Edit"));
        assert!(!invalidators.contains(&"Bash"));

        assert!(ToolPolicy::invalidated_by("WebFetch").is_empty());
    }
}
