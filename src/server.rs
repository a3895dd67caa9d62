//! MCP server surface and lifecycle.

use rmcp::model::{
    CallToolRequestParam, CallToolResult, ListToolsResult, PaginatedRequestParam,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::{QuitReason, RequestContext, RunningService};
use rmcp::transport::IntoTransport;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, ServiceExt};
use thiserror::Error;
use tracing::info;

use crate::tools::{DispatchError, Dispatcher};

pub const SERVER_NAME: &str = "anki-connect";

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to start MCP server: {0}")]
    Start(String),

    #[error("MCP server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// `ServerHandler` answering `tools/list` and `tools/call` through a [`Dispatcher`].
#[derive(Clone)]
pub struct AnkiServer {
    dispatcher: Dispatcher,
}

impl AnkiServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

impl From<DispatchError> for McpError {
    fn from(err: DispatchError) -> Self {
        McpError::invalid_params(err.to_string(), None)
    }
}

impl ServerHandler for AnkiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: rmcp::model::Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Creates Anki notes through AnkiConnect. Anki must be running with the \
                 AnkiConnect add-on installed. Use add-note with deckName, modelName and fields."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.dispatcher.list()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatcher.dispatch(request).await?)
    }
}

/// Server context built once at startup; `start` binds it to a transport.
pub struct Bridge {
    server: AnkiServer,
}

impl Bridge {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            server: AnkiServer::new(dispatcher),
        }
    }

    pub fn server(&self) -> &AnkiServer {
        &self.server
    }

    /// Run the MCP handshake over `transport` and keep serving in the background.
    pub async fn start<T, E, A>(self, transport: T) -> Result<RunningBridge, BridgeError>
    where
        T: IntoTransport<RoleServer, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let service = self
            .server
            .serve(transport)
            .await
            .map_err(|e| BridgeError::Start(e.to_string()))?;
        info!("{} MCP server started", SERVER_NAME);
        Ok(RunningBridge { service })
    }
}

/// A started [`Bridge`].
pub struct RunningBridge {
    service: RunningService<RoleServer, AnkiServer>,
}

impl RunningBridge {
    /// Serve until the peer closes the stream.
    pub async fn wait(self) -> Result<QuitReason, BridgeError> {
        let reason = self.service.waiting().await?;
        info!(?reason, "MCP server stopped");
        Ok(reason)
    }

    /// Stop serving and release the transport.
    pub async fn stop(self) -> Result<QuitReason, BridgeError> {
        let reason = self.service.cancel().await?;
        info!(?reason, "MCP server stopped");
        Ok(reason)
    }
}
