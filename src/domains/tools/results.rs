//! Builders for tool results.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use tracing::warn;

use crate::domains::canvas::ApiError;

/// Plain text success result.
pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Success result carrying a text summary and a structured payload.
pub fn structured_result<T: Serialize>(summary: String, data: &T) -> CallToolResult {
    match serde_json::to_value(data) {
        Ok(structured) => CallToolResult {
            content: vec![Content::text(summary)],
            structured_content: Some(structured),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => {
            warn!("Failed to serialize structured content: {}", e);
            text_result(summary)
        }
    }
}

/// Error result for a failed Canvas call.
///
/// Structured content is `{"error": {"kind", "message", "status"?}}`.
pub fn api_error_result(error: &ApiError) -> CallToolResult {
    let mut detail = serde_json::json!({
        "kind": error.kind(),
        "message": error.to_string(),
    });
    if let Some(status) = error.status() {
        detail["status"] = status.into();
    }

    CallToolResult {
        content: vec![Content::text(format!("Error: {error}"))],
        structured_content: Some(serde_json::json!({ "error": detail })),
        is_error: Some(true),
        meta: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    #[test]
    fn test_api_error_result_without_status() {
        let result = api_error_result(&ApiError::MissingToken);
        assert_eq!(result.is_error, Some(true));
        let error = &result.structured_content.as_ref().unwrap()["error"];
        assert_eq!(error["kind"], "ConfigurationError");
        assert!(error.get("status").is_none());
        match &result.content[0].raw {
            RawContent::Text(t) => assert!(t.text.contains("CANVAS_API_TOKEN")),
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_structured_result() {
        let result = structured_result("2 items".into(), &serde_json::json!({ "count": 2 }));
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.structured_content.unwrap()["count"], 2);
    }
}
