//! Toolbox MCP Server Library
//!
//! A set of small utility operations (math, date and time, text, weather,
//! IP geolocation, user profile) grouped into namespaces and exposed
//! uniformly through two front-ends: the `tools` command-line dispatcher
//! and a Model Context Protocol (MCP) server.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, logging, the MCP server and
//!   its transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: the operation model, the registry that discovers every
//!     namespace, CLI dispatch, the MCP tool router, and the namespaces
//!     themselves
//!
//! # Example
//!
//! ```rust,no_run
//! use toolbox_mcp_server::core::Config;
//! use toolbox_mcp_server::domains::tools::{Dispatcher, Registry};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let registry = Registry::build()?;
//!     let outcome = Dispatcher::new(&registry, &config)
//!         .call("math__add", &["2".to_string(), "3".to_string()])?;
//!     println!("{}", outcome.to_json());
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
