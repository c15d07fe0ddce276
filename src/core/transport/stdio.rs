//! STDIO transport implementation.
//!
//! Standard input/output transport for MCP - the default and recommended mode.

use std::future::Future;

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport until the client disconnects or `shutdown` resolves.
    pub async fn run<S>(server: McpServer, shutdown: S) -> TransportResult<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        info!("Ready - communicating via stdin/stdout");

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;
        let cancel = service.cancellation_token();

        tokio::select! {
            result = service.waiting() => {
                let reason = result.map_err(|e| TransportError::service(e.to_string()))?;
                info!("STDIO session ended: {:?}", reason);
            }
            _ = shutdown => {
                cancel.cancel();
                info!("STDIO session cancelled");
            }
        }

        info!("STDIO transport finished");
        Ok(())
    }
}
