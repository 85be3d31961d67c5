//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Every registered operation becomes one route named `namespace__operation`
//! with an input schema generated from its parameter list. Results are
//! returned as JSON text.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, Content, JsonObject, Tool},
};
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use super::error::DispatchError;
use super::operation::ParamSpec;
use super::registry::{Operation, Registry};
use crate::core::config::Config;

/// Build the tool router with every registered operation.
pub fn build_tool_router<S>(registry: Arc<Registry>, config: Arc<Config>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .operations()
        .fold(ToolRouter::new(), |router, operation| {
            router.with_route(create_route(operation, registry.clone(), config.clone()))
        })
}

/// Tool metadata for one operation.
pub fn to_tool(operation: &Operation) -> Tool {
    Tool {
        name: operation.qualified_name().into(),
        description: Some(operation.protocol_description().into()),
        input_schema: Arc::new(input_schema(operation.params())),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// JSON schema for a parameter list.
pub fn input_schema(params: &[ParamSpec]) -> JsonObject {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for spec in params {
        let mut property = Map::new();
        property.insert("type".into(), json!(spec.kind.schema_type()));
        if !spec.description.is_empty() {
            property.insert("description".into(), json!(spec.description));
        }
        match &spec.default {
            Some(default) => {
                property.insert("default".into(), default.clone());
            }
            None => required.push(json!(spec.name)),
        }
        properties.insert(spec.name.to_string(), Value::Object(property));
    }

    let mut schema = Map::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }
    schema
}

/// Create a ToolRoute for STDIO/TCP transport.
fn create_route<S>(operation: &Operation, registry: Arc<Registry>, config: Arc<Config>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let name = operation.qualified_name();

    ToolRoute::new_dyn(to_tool(operation), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let registry = registry.clone();
        let config = config.clone();
        let name = name.clone();
        async move {
            // Operations block on network and subprocess I/O, so they run on
            // their own OS thread instead of a runtime worker.
            let (tx, rx) = tokio::sync::oneshot::channel();
            std::thread::spawn(move || {
                let _ = tx.send(call_tool(&registry, &name, &args, &config));
            });

            rx.await
                .map_err(|_| McpError::internal_error("Tool thread panicked".to_string(), None))?
        }
        .boxed()
    })
}

/// Invoke an operation and encode the outcome as an MCP tool result.
///
/// Soft failures are ordinary results whose JSON carries `error`; hard
/// failures are flagged with `isError`; binding problems are protocol
/// errors.
pub fn call_tool(
    registry: &Registry,
    name: &str,
    args: &JsonObject,
    config: &Config,
) -> Result<CallToolResult, McpError> {
    info!("Tool call: {}", name);

    match registry.invoke(name, args, config) {
        Ok(outcome) => Ok(CallToolResult::success(vec![Content::text(outcome.to_json())])),
        Err(e @ DispatchError::Failed { .. }) => {
            warn!("{}", e);
            Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
        }
        Err(e) => Err(McpError::invalid_params(e.to_string(), None)),
    }
}

/// HTTP handler for tool calls (for HTTP transport).
#[cfg(feature = "http")]
pub fn http_handler(
    registry: &Registry,
    name: &str,
    arguments: Value,
    config: &Config,
) -> Result<Value, String> {
    let args = match arguments {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        _ => return Err("Tool arguments must be a JSON object".to_string()),
    };

    let result = call_tool(registry, name, &args, config).map_err(|e| e.message.to_string())?;

    Ok(json!({
        "content": result.content,
        "isError": result.is_error.unwrap_or(false)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    struct TestServer {}

    fn shared() -> (Arc<Registry>, Arc<Config>) {
        (
            Arc::new(Registry::build().unwrap()),
            Arc::new(Config::default()),
        )
    }

    fn text_of(result: &CallToolResult) -> String {
        match &result.content[0].raw {
            RawContent::Text(text) => text.text.clone(),
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[test]
    fn test_build_router_matches_registry() {
        let (registry, config) = shared();
        let router: ToolRouter<TestServer> = build_tool_router(registry.clone(), config);
        let tools = router.list_all();

        assert_eq!(tools.len(), registry.tool_names().len());
        let names: Vec<_> = tools.iter().map(|t| t.name.to_string()).collect();
        for name in registry.tool_names() {
            assert!(names.contains(&name), "missing route {name}");
        }
    }

    #[test]
    fn test_input_schema_from_signature() {
        let (registry, _) = shared();
        let schema = input_schema(registry.lookup("math__log").unwrap().params());

        assert_eq!(schema["type"], json!("object"));
        assert_eq!(schema["properties"]["a"]["type"], json!("number"));
        assert_eq!(schema["properties"]["base"]["default"], json!(10.0));
        assert_eq!(schema["required"], json!(["a"]));

        let schema = input_schema(registry.lookup("math__constants").unwrap().params());
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn test_call_tool_returns_json_text() {
        let (registry, config) = shared();
        let args = json!({ "a": 1, "b": 2 });
        let result = call_tool(&registry, "math__add", args.as_object().unwrap(), &config).unwrap();

        assert_eq!(result.is_error, Some(false));
        let payload: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(payload, json!({ "result": 3.0 }));
    }

    #[test]
    fn test_call_tool_soft_failure_is_not_flagged() {
        let (registry, config) = shared();
        let args = json!({ "a": -1 });
        let result =
            call_tool(&registry, "math__square_root", args.as_object().unwrap(), &config).unwrap();

        assert_eq!(result.is_error, Some(false));
        assert!(text_of(&result).contains("\"error\""));
    }

    #[test]
    fn test_call_tool_hard_failure_is_flagged() {
        let (registry, _) = shared();
        let mut config = Config::default();
        config.tools.user_data_path = "/nonexistent/user.data.json".into();

        let result =
            call_tool(&registry, "user_information__personal_data", &JsonObject::new(), &config)
                .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("birthday"));
    }

    #[test]
    fn test_call_tool_bad_arguments_are_protocol_errors() {
        let (registry, config) = shared();
        let args = json!({ "n": "many" });
        assert!(call_tool(&registry, "math__factorial", args.as_object().unwrap(), &config).is_err());
    }
}
