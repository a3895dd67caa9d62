//! # anki-mcp - MCP bridge to AnkiConnect
//!
//! Exposes Anki operations as Model Context Protocol tools and forwards each
//! call to the AnkiConnect add-on's JSON-over-HTTP API.
//!
//! ## Architecture
//!
//! 1. **[`Dispatcher`]** declares the tools and routes calls by name.
//! 2. **[`AnkiClient`]** performs one AnkiConnect request per call and
//!    normalizes the reply envelope into `Ok(result)` or a [`ClientError`].
//! 3. **[`Bridge`]** wraps the dispatcher in an `rmcp` server with explicit
//!    `start`/`stop` lifecycle.
//!
//! A failure inside a known tool becomes the response text
//! (`"Failed to create note: ..."`); only an unknown tool name is reported as
//! a protocol error.
//!
//! ## Example
//! ```no_run
//! use anki_mcp::{AnkiClient, Bridge, ConnectOptions, Dispatcher};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AnkiClient::new(ConnectOptions::new())?;
//!     let bridge = Bridge::new(Dispatcher::new(client));
//!     let running = bridge.start(rmcp::transport::stdio()).await?;
//!     running.wait().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod model;
pub mod options;
pub mod server;
pub mod tools;

pub use client::{AnkiClient, AnkiConnect, ClientError};
pub use model::{Invocation, Note, Reply};
pub use options::{ConnectOptions, ANKI_CONNECT_VERSION, DEFAULT_ANKI_CONNECT_URL};
pub use server::{AnkiServer, Bridge, BridgeError, RunningBridge};
pub use tools::{AddNoteArgs, DispatchError, Dispatcher, ToolError, ToolKind};

// Re-export rmcp for convenience
pub use rmcp;
