//! Raw Canvas API passthrough tool.

use reqwest::Method;
use rmcp::model::{CallToolResult, JsonObject};
use schemars::JsonSchema;
use serde::Serialize;
use tracing::{info, instrument};

use crate::domains::canvas::{CanvasClient, QueryParams};
use crate::domains::tools::{ToolArguments, ToolDefinition, ToolError, results::structured_result};

/// Parameters for the API request tool.
#[derive(Debug, Clone, Default, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ApiRequestParams {
    /// HTTP method: GET, POST, PUT, DELETE or PATCH (case-insensitive).
    pub method: String,

    /// Path relative to the Canvas API root, e.g. `courses/123/assignments`.
    pub path: String,

    /// Query parameters. Array values are sent as repeated keys, so
    /// `{"include[]": ["term", "teachers"]}` works as Canvas expects.
    #[serde(default)]
    pub params: Option<JsonObject>,

    /// JSON request body.
    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

/// Structured output of a passthrough call.
#[derive(Debug, Clone, Serialize)]
pub struct ApiRequestOutput {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub data: serde_json::Value,
}

/// API request tool - forwards an arbitrary request to the Canvas API.
pub struct ApiRequestTool;

impl ToolDefinition for ApiRequestTool {
    const NAME: &'static str = "api_request";
    const DESCRIPTION: &'static str = "Make a raw API request to any Canvas REST endpoint. \
        The path is relative to the configured Canvas API root (for example `users/self` or \
        `courses/123/assignments`). Returns the response status and body.";
    const ARGUMENTS: &'static [&'static str] = &["method", "path", "params", "body"];
    type Params = ApiRequestParams;
}

impl ApiRequestTool {
    /// Validate raw arguments into a method, path, query and body.
    pub fn parse(
        args: &ToolArguments,
    ) -> Result<(Method, String, QueryParams, Option<serde_json::Value>), ToolError> {
        args.accept_only(Self::ARGUMENTS)?;

        let method_name: String = args.required("method")?;
        let method = parse_method(&method_name)?;

        let path: String = args.required("path")?;
        let path = path.trim().to_string();
        if path.is_empty() {
            return Err(ToolError::invalid_argument("path", "must not be empty"));
        }
        if path.contains("://") || path.starts_with("//") {
            return Err(ToolError::invalid_argument(
                "path",
                "must be relative to the Canvas API root, absolute URLs are not allowed",
            ));
        }

        let query = match args.optional::<JsonObject>("params")? {
            Some(object) => QueryParams::from_json(&object).map_err(|key| {
                ToolError::invalid_argument(
                    format!("params.{key}"),
                    "values must be strings, numbers, booleans or arrays of them",
                )
            })?,
            None => QueryParams::new(),
        };

        let body = args.optional::<serde_json::Value>("body")?;

        Ok((method, path, query, body))
    }

    #[instrument(skip_all)]
    pub async fn execute(
        client: &CanvasClient,
        args: &ToolArguments,
    ) -> Result<CallToolResult, ToolError> {
        let (method, path, query, body) = Self::parse(args)?;
        info!("API request tool called: {} {}", method, path);

        let response = client.request(method.clone(), &path, &query, body.as_ref()).await?;
        let data = response.data();

        let rendered = match &data {
            serde_json::Value::String(text) => text.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| response.body.clone()),
        };
        let summary = format!(
            "API Response from {} (Status: {}):\n{}",
            path, response.status, rendered
        );

        let output = ApiRequestOutput {
            method: method.to_string(),
            path,
            status: response.status,
            data,
        };
        Ok(structured_result(summary, &output))
    }
}

fn parse_method(name: &str) -> Result<Method, ToolError> {
    match name.trim().to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        "PATCH" => Ok(Method::PATCH),
        _ => Err(ToolError::invalid_argument(
            "method",
            format!("unsupported method '{name}', expected GET, POST, PUT, DELETE or PATCH"),
        )),
    }
}
