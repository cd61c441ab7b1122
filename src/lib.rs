//! context-index-mcp: MCP server exposing a source tree as read-only resources
//!
//! The configured root directory holds one subdirectory per service. At
//! startup every relevant source and configuration file below those
//! directories is indexed, and clients can then list and read the files over
//! a line-delimited JSON-RPC channel on stdin/stdout.
//!
//! # Architecture
//!
//! - **Catalog**: built once by a directory scan, immutable afterwards
//! - **Addressing**: `<scheme>://<service>/<relative path>` URIs
//! - **Dispatch**: one response per request line, errors never stop the loop
//!
//! # Modules
//!
//! - [`catalog`] — Scanning, file records, URIs and content types
//! - [`config`] — Configuration loading and context root resolution
//! - [`error`] — Configuration error types
//! - [`mcp`] — Protocol, transport and request loop

pub mod catalog;
pub mod config;
pub mod error;
pub mod mcp;
