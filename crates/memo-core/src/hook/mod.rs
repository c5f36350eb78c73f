//! Request/response types for the process boundary
//!
//! The agent runtime invokes the cache twice per tool call, each time as
//! a short-lived process reading one JSON object from stdin and writing
//! one JSON object to stdout. These types are deliberately permissive:
//! missing fields default, unknown fields are ignored, and a miss renders
//! as exactly `{}` so the runtime proceeds normally.

mod input;
mod output;

pub use input::HookInput;
pub use output::{CacheDecision, CheckOutput};
