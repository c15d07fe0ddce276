//! Canvas MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing the Canvas LMS REST and
//! GraphQL APIs as tools an assistant can call.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server handler and its transports
//! - **domains**: business logic organized by bounded contexts
//!   - **canvas**: authenticated Canvas API client with pagination and GraphQL
//!   - **tools**: the tool registry, argument validation and tool definitions
//!
//! # Example
//!
//! ```rust,no_run
//! use canvas_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
