//! Configuration management for the MCP server.
//!
//! Configuration is read once at startup from environment variables (a
//! `.env` file is honoured) and then passed around as an immutable value.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};

/// Default Canvas API root.
pub const DEFAULT_CANVAS_BASE_URL: &str = "https://canvas.instructure.com/api/v1";

/// Default request timeout in seconds.
pub const DEFAULT_CANVAS_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Canvas API access.
    pub canvas: CanvasConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Canvas API credentials and connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Personal access token sent as a bearer credential.
    #[serde(skip_serializing)]
    pub api_token: Option<String>,

    /// API root, e.g. `https://school.instructure.com/api/v1`.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CanvasConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: DEFAULT_CANVAS_BASE_URL.to_string(),
            timeout_secs: DEFAULT_CANVAS_TIMEOUT_SECS,
        }
    }
}

impl CanvasConfig {
    /// Whether a non-blank token is configured.
    pub fn has_token(&self) -> bool {
        self.api_token
            .as_deref()
            .is_some_and(|token| !token.trim().is_empty())
    }

    /// Check that API calls can be made with this configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.has_token() {
            return Err(Error::config(
                "CANVAS_API_TOKEN is required. Please set it in your environment or .env file.",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("CANVAS_TIMEOUT must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "canvas-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            canvas: CanvasConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first; variables
    /// already set in the environment win.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Recognised variables: `CANVAS_API_TOKEN`, `CANVAS_BASE_URL`,
    /// `CANVAS_TIMEOUT`, `LOG_LEVEL` / `MCP_LOG_LEVEL`, `DEBUG`,
    /// `MCP_SERVER_NAME` and the `MCP_TRANSPORT` / `MCP_HTTP_*` family.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(name) = var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Some(level) = var("LOG_LEVEL").or_else(|| var("MCP_LOG_LEVEL")) {
            config.logging.level = level.to_lowercase();
        }
        if var("DEBUG").is_some_and(|v| is_truthy(&v)) {
            config.logging.level = "debug".to_string();
        }

        config.canvas.api_token = var("CANVAS_API_TOKEN").map(|t| t.trim().to_string());

        if let Some(base_url) = var("CANVAS_BASE_URL") {
            config.canvas.base_url = base_url.trim().to_string();
        }

        if let Some(timeout) = var("CANVAS_TIMEOUT") {
            config.canvas.timeout_secs = timeout.trim().parse().map_err(|_| {
                Error::config(format!(
                    "CANVAS_TIMEOUT must be a whole number of seconds, got {timeout:?}"
                ))
            })?;
        }

        config.transport = TransportConfig::from_source(&var)?;

        Ok(config)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
