//! Dispatch of qualified names with positional string arguments.
//!
//! This is the direct-call interface used by the `tools` binary: resolve
//! `namespace__operation`, coerce each argument to the declared parameter
//! kind, run the operation and hand back either its mapping or the
//! `{"error": ...}` mapping of a soft failure.

use std::fmt;

use serde_json::Value;
use tracing::info;

use super::error::DispatchError;
use super::operation::SEPARATOR;
use super::registry::Registry;
use crate::core::config::Config;

/// A `namespace__operation` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub namespace: String,
    pub operation: String,
}

impl QualifiedName {
    /// Parse `ns__op`; `ns.op` is accepted as an input alias.
    pub fn parse(raw: &str) -> Result<Self, DispatchError> {
        let (namespace, operation) = raw
            .split_once(SEPARATOR)
            .or_else(|| raw.split_once('.'))
            .ok_or_else(|| DispatchError::InvalidName(raw.to_string()))?;

        if namespace.is_empty() || operation.is_empty() {
            return Err(DispatchError::InvalidName(raw.to_string()));
        }

        Ok(Self {
            namespace: namespace.to_string(),
            operation: operation.to_string(),
        })
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.namespace, SEPARATOR, self.operation)
    }
}

/// What a completed call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The operation's own mapping.
    Success(Value),
    /// A soft failure, already rendered as `{"error": ...}`.
    SoftFailure(Value),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn payload(&self) -> &Value {
        match self {
            Self::Success(v) | Self::SoftFailure(v) => v,
        }
    }

    /// Pretty JSON in the mapping's insertion order.
    pub fn to_json(&self) -> String {
        render_json(self.payload())
    }
}

/// Render a payload the way both front-ends print it.
pub fn render_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Positional-argument dispatcher over a registry.
pub struct Dispatcher<'a> {
    registry: &'a Registry,
    config: &'a Config,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a Registry, config: &'a Config) -> Self {
        Self { registry, config }
    }

    /// Resolve, coerce and invoke.
    pub fn call(&self, name: &str, args: &[String]) -> Result<Outcome, DispatchError> {
        let qualified = QualifiedName::parse(name)?;
        let operation = self.registry.resolve(&qualified)?;
        let bound = operation
            .definition()
            .bind_positional(&qualified.to_string(), args)?;

        info!("Dispatching {} with {} argument(s)", qualified, args.len());
        operation.run(&bound, self.config)
    }

    /// Human-readable directory of every namespace and operation.
    pub fn listing(&self, program: &str) -> String {
        let mut out = format!(
            "Usage: {} <namespace>{}<operation> [args...]\n\nAvailable functions:\n",
            program, SEPARATOR
        );

        for namespace in self.registry.namespaces() {
            out.push('\n');
            if namespace.description().is_empty() {
                out.push_str(&format!("  [{}]\n", namespace.name()));
            } else {
                out.push_str(&format!(
                    "  [{}] {}\n",
                    namespace.name(),
                    namespace.description()
                ));
            }
            for operation in namespace.operations() {
                out.push_str(&format!("    {}\n", operation.signature()));
                if !operation.description().is_empty() {
                    out.push_str(&format!("      {}\n", operation.description()));
                }
            }
        }

        out
    }
}
