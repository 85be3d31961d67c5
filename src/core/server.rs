//! MCP Server implementation and lifecycle management.
//!
//! The server exposes every registered operation as one MCP tool. Tools are
//! not declared here: the router is built from the registry, so adding an
//! operation under `domains/tools/definitions/` needs no change in this file.

use std::sync::Arc;

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use tracing::info;

use super::config::Config;
use crate::domains::tools::{Registry, build_tool_router};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Every discovered operation.
    registry: Arc<Registry>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Build the registry and the tool router. Fails if any namespace is
    /// malformed.
    pub fn new(config: Config) -> crate::Result<Self> {
        let registry = Registry::build()?;
        Ok(Self::with_registry(config, registry))
    }

    /// Serve an already-built registry.
    pub fn with_registry(config: Config, registry: Registry) -> Self {
        let config = Arc::new(config);
        let registry = Arc::new(registry);
        info!(
            "Registered {} tools across {} namespaces",
            registry.operations().count(),
            registry.namespaces().count()
        );

        Self {
            tool_router: build_tool_router::<Self>(registry.clone(), config.clone()),
            config,
            registry,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, String> {
        let registry = self.registry.clone();
        let config = self.config.clone();
        let name = name.to_string();

        tokio::task::spawn_blocking(move || {
            crate::domains::tools::router::http_handler(&registry, &name, arguments, &config)
        })
        .await
        .map_err(|e| format!("Tool task failed: {}", e))?
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            instructions: Some(format!(
                "Utility tools grouped by namespace ({}). Tool names are <namespace>__<operation>; \
                 results are JSON objects, and failures carry an \"error\" key.",
                self.registry.namespace_names().join(", ")
            )),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
