//! Model Context Protocol (MCP) resource server.
//!
//! This module exposes the catalog as read-only resources to AI assistants.
//! The server communicates over stdio using line-delimited JSON-RPC 2.0
//! messages and supports `resources/list` and `resources/read`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         MCP Server                          │
//! │                                                             │
//! │   ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    │
//! │   │  Transport  │───▶│   Server    │───▶│ Dispatcher  │    │
//! │   │   (stdio)   │    │   (loop)    │    │  (catalog)  │    │
//! │   └─────────────┘    └─────────────┘    └─────────────┘    │
//! │          │                  │                  │            │
//! │          ▼                  ▼                  ▼            │
//! │   ┌─────────────────────────────────────────────────┐      │
//! │   │              JSON-RPC Messages                  │      │
//! │   └─────────────────────────────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod dispatcher;
pub mod protocol;
pub mod server;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use protocol::{parse_request, JsonRpcError, JsonRpcResponse, RequestId, ResourceRequest};
pub use server::{McpServer, ServerState};
pub use transport::{LineTransport, StdioTransport};
