//! Hello world tool definition.
//!
//! A connectivity check that never touches the Canvas API.

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use tracing::{info, instrument};

use crate::domains::tools::{ToolArguments, ToolDefinition, ToolError, results::text_result};

/// The hello world tool takes no parameters.
#[derive(Debug, Clone, Default, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct HelloWorldParams {}

/// Hello world tool - returns a fixed greeting.
pub struct HelloWorldTool;

impl ToolDefinition for HelloWorldTool {
    const NAME: &'static str = "hello_world";
    const DESCRIPTION: &'static str =
        "Return a fixed greeting. Useful to check that the Canvas MCP server is reachable.";
    const ARGUMENTS: &'static [&'static str] = &[];
    type Params = HelloWorldParams;
}

impl HelloWorldTool {
    pub const GREETING: &'static str = "Hello, World!";

    #[instrument(skip_all)]
    pub fn execute(args: &ToolArguments) -> Result<CallToolResult, ToolError> {
        args.accept_only(Self::ARGUMENTS)?;
        info!("Hello world tool called");
        Ok(text_result(Self::GREETING))
    }
}
