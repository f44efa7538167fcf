use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during tool execution.
///
/// These cover protocol-level failures only (unknown tool, malformed
/// arguments). Domain-level outcomes — partner not found, bad location,
/// provider unavailable — are reported to the model as ordinary tool
/// output text so the conversation can continue.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
