//! Tool-specific error types.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use thiserror::Error;
use tracing::warn;

use super::results::api_error_result;
use crate::domains::canvas::ApiError;

/// Errors that can occur during tool dispatch and execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool is registered under the requested name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// An argument was unknown, missing, of the wrong type or out of range.
    #[error("Invalid argument '{field}': {reason}")]
    InvalidArguments { field: String, reason: String },

    /// The Canvas API call behind the tool failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "invalid arguments" error for `field`.
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Stable error kind reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "UnknownTool",
            Self::InvalidArguments { .. } => "InvalidArguments",
            Self::Api(e) => e.kind(),
        }
    }

    /// Map to the protocol response.
    ///
    /// Dispatch failures are protocol errors; API failures are tool results
    /// flagged `isError` so the assistant can read and react to them.
    pub fn into_call_result(self) -> Result<CallToolResult, McpError> {
        match self {
            Self::Api(e) => {
                warn!(kind = e.kind(), status = ?e.status(), "Canvas call failed: {}", e);
                Ok(api_error_result(&e))
            }
            Self::UnknownTool(ref name) => {
                warn!("Unknown tool requested: {}", name);
                Err(McpError::invalid_params(
                    self.to_string(),
                    Some(serde_json::json!({ "kind": self.kind(), "tool": name })),
                ))
            }
            Self::InvalidArguments { ref field, .. } => {
                warn!("Invalid tool arguments: {}", self);
                Err(McpError::invalid_params(
                    self.to_string(),
                    Some(serde_json::json!({ "kind": self.kind(), "field": field })),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[test]
    fn test_invalid_argument_names_field() {
        let err = ToolError::invalid_argument("limit", "must be between 1 and 1000");
        assert_eq!(err.to_string(), "Invalid argument 'limit': must be between 1 and 1000");
        assert_eq!(err.kind(), "InvalidArguments");
    }

    #[test]
    fn test_dispatch_errors_become_invalid_params() {
        let err = ToolError::unknown_tool("nope").into_call_result().unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.data.unwrap()["kind"], "UnknownTool");
    }

    #[test]
    fn test_api_errors_become_error_results() {
        let err = ToolError::from(ApiError::from_response(404, ""));
        assert_eq!(err.kind(), "RemoteError");
        let result = err.into_call_result().unwrap();
        assert_eq!(result.is_error, Some(true));
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["error"]["kind"], "RemoteError");
        assert_eq!(structured["error"]["status"], 404);
    }
}
