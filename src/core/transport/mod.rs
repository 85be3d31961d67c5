//! Transport layer for the MCP server.
//!
//! - **STDIO**: standard input/output, the usual MCP mode - feature `stdio`
//! - **TCP**: line-delimited JSON-RPC over a raw socket - feature `tcp`
//! - **HTTP**: JSON-RPC over POST - feature `http`
//!
//! Each transport owns the connection lifecycle and hands messages to the
//! same [`McpServer`](crate::core::McpServer).

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
