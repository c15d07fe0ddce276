//! Error types and handling for the MCP server.
//!
//! This module defines the crate-level error type covering startup and
//! serving failures. Per-call failures stay in the domain error types
//! (`ToolError`, `ApiError`) and never reach this level.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The Canvas client could not be built.
    #[error("Canvas client error: {0}")]
    Api(#[from] crate::domains::canvas::ApiError),

    /// The transport failed to start or stopped abnormally.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
