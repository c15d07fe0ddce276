//! MCP Server implementation and lifecycle management.
//!
//! The server handler lists the registered tools and dispatches calls to
//! the [`ToolRegistry`]. Tool failures are mapped here, at the protocol
//! boundary: dispatch errors become protocol errors and Canvas failures
//! become `isError` tool results, so no call can take the server down.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Result;
use crate::domains::canvas::CanvasClient;
use crate::domains::tools::{ToolError, ToolRegistry};

/// Instructions sent to clients on initialization.
pub const INSTRUCTIONS: &str = "Canvas MCP Server - tools for the Canvas LMS API. \
    Use get_all_courses to list your courses, get_course_by_id for one course, \
    get_course_summaries for a compact overview and api_request for any other endpoint.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registered tools and the Canvas client they share.
    tools: Arc<ToolRegistry>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        let client = CanvasClient::new(&config.canvas)?;

        Ok(Self {
            config: Arc::new(config),
            tools: Arc::new(ToolRegistry::new(client)),
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// List all available tools.
    pub fn tools(&self) -> Vec<Tool> {
        ToolRegistry::get_all_tools()
    }

    /// Call a tool by name, mapping failures to the protocol response.
    #[instrument(skip(self, arguments))]
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> std::result::Result<CallToolResult, McpError> {
        info!("Calling tool: {}", name);
        self.tools
            .call(name, arguments)
            .await
            .or_else(ToolError::into_call_result)
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.dispatch(&request.name, request.arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CanvasConfig;

    fn server() -> McpServer {
        McpServer::new(Config::default()).unwrap()
    }

    #[test]
    fn test_get_info() {
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert_eq!(info.server_info.name, "canvas-mcp-server");
        assert!(info.instructions.unwrap().contains("get_all_courses"));
    }

    #[test]
    fn test_invalid_base_url_fails_startup() {
        let config = Config {
            canvas: CanvasConfig {
                base_url: "ftp://canvas.test".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(McpServer::new(config).is_err());
    }

    #[tokio::test]
    async fn test_dispatch_maps_errors() {
        let server = server();

        let err = server.dispatch("nope", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

        // No token configured: a tool result flagged as error, not a protocol error.
        let result = server.dispatch("get_course_summaries", None).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result.structured_content.unwrap()["error"]["kind"],
            "ConfigurationError"
        );
    }
}
