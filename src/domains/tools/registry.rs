//! Tool Registry - central registration and dispatch for all tools.
//!
//! Both transports list tools and dispatch calls through this registry.

use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use tracing::{debug, instrument};

use super::definitions::{
    ApiRequestTool, GetAllCoursesTool, GetCourseByIdTool, GetCourseSummariesTool, HelloWorldTool,
};
use super::{ToolArguments, ToolError};
use crate::domains::canvas::CanvasClient;

/// Static metadata shared by every tool.
pub trait ToolDefinition {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Argument names the tool accepts, aliases included. Must match the
    /// properties of the `Params` schema.
    const ARGUMENTS: &'static [&'static str];

    /// Parameters type the input schema is generated from.
    type Params: JsonSchema + 'static;

    /// Create a Tool model for this tool (metadata).
    fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<Self::Params>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

/// Tool registry - owns the Canvas client and dispatches calls by name.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    client: CanvasClient,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(client: CanvasClient) -> Self {
        Self { client }
    }

    /// Get all tool names.
    pub fn tool_names() -> Vec<&'static str> {
        vec![
            HelloWorldTool::NAME,
            GetAllCoursesTool::NAME,
            GetCourseByIdTool::NAME,
            GetCourseSummariesTool::NAME,
            ApiRequestTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            HelloWorldTool::to_tool(),
            GetAllCoursesTool::to_tool(),
            GetCourseByIdTool::to_tool(),
            GetCourseSummariesTool::to_tool(),
            ApiRequestTool::to_tool(),
        ]
    }

    /// Validate arguments and run the named tool.
    ///
    /// Unknown names fail before any argument is looked at, so they never
    /// reach the Canvas client.
    #[instrument(skip(self, arguments))]
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ToolError> {
        let args = ToolArguments::new(arguments);
        debug!(argument_count = args.len(), "Dispatching tool call");

        match name {
            HelloWorldTool::NAME => HelloWorldTool::execute(&args),
            GetAllCoursesTool::NAME => GetAllCoursesTool::execute(&self.client, &args).await,
            GetCourseByIdTool::NAME => GetCourseByIdTool::execute(&self.client, &args).await,
            GetCourseSummariesTool::NAME => {
                GetCourseSummariesTool::execute(&self.client, &args).await
            }
            ApiRequestTool::NAME => ApiRequestTool::execute(&self.client, &args).await,
            _ => Err(ToolError::unknown_tool(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CanvasConfig;
    use wiremock::matchers::any;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_registry_tool_names() {
        let names = ToolRegistry::tool_names();
        assert_eq!(names.len(), 5);
        assert!(names.contains(&"hello_world"));
        assert!(names.contains(&"get_all_courses"));
        assert!(names.contains(&"get_course_by_id"));
        assert!(names.contains(&"get_course_summaries"));
        assert!(names.contains(&"api_request"));
    }

    #[test]
    fn test_tools_match_names() {
        let tools = ToolRegistry::get_all_tools();
        let names: Vec<_> = tools.iter().map(|t| t.name.to_string()).collect();
        assert_eq!(names, ToolRegistry::tool_names());
        for tool in &tools {
            assert_eq!(
                tool.input_schema.get("type").and_then(|t| t.as_str()),
                Some("object"),
                "schema of {} must be an object",
                tool.name
            );
        }
    }

    fn assert_schema_matches_arguments<T: ToolDefinition>() {
        let tool = T::to_tool();
        let mut published: Vec<&str> = tool
            .input_schema
            .get("properties")
            .and_then(|p| p.as_object())
            .map(|p| p.keys().map(String::as_str).collect())
            .unwrap_or_default();
        published.sort_unstable();

        let mut accepted = T::ARGUMENTS.to_vec();
        accepted.sort_unstable();

        assert_eq!(published, accepted, "schema of {} drifted from its arguments", T::NAME);
        assert_eq!(
            tool.input_schema.get("additionalProperties"),
            Some(&serde_json::Value::Bool(false)),
            "schema of {} must reject unknown arguments",
            T::NAME
        );
    }

    #[test]
    fn test_schemas_match_accepted_arguments() {
        assert_schema_matches_arguments::<HelloWorldTool>();
        assert_schema_matches_arguments::<GetAllCoursesTool>();
        assert_schema_matches_arguments::<GetCourseByIdTool>();
        assert_schema_matches_arguments::<GetCourseSummariesTool>();
        assert_schema_matches_arguments::<ApiRequestTool>();
    }

    #[test]
    fn test_aliases_are_published() {
        let tool = GetAllCoursesTool::to_tool();
        let properties = tool.input_schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("type"));
        assert!(properties.contains_key("state"));
    }

    #[tokio::test]
    async fn test_unknown_tool_never_reaches_canvas() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = CanvasClient::new(&CanvasConfig {
            api_token: Some("test-token".into()),
            base_url: format!("{}/api/v1", server.uri()),
            timeout_secs: 5,
        })
        .unwrap();
        let registry = ToolRegistry::new(client);

        let err = registry.call("drop_all_courses", None).await.unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "drop_all_courses"));
    }

    #[tokio::test]
    async fn test_hello_world_dispatch() {
        let registry = ToolRegistry::new(CanvasClient::new(&CanvasConfig::default()).unwrap());
        let result = registry.call("hello_world", None).await.unwrap();
        assert_eq!(result.is_error, Some(false));
    }
}
