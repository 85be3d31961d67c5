//! Tool-specific error types.
//!
//! Three layers fail differently:
//! - [`OperationError`]: raised by an operation body. Every kind except
//!   `ConfigurationMissing` is soft and gets reported as `{"error": ...}`.
//! - [`ArgumentError`]: arguments could not be bound to the signature.
//! - [`DispatchError`]: the qualified name could not be resolved, or the
//!   call failed hard.
//!
//! [`RegistryError`] is separate: it only happens while building the
//! registry and is always fatal.

use serde_json::{Value, json};
use thiserror::Error;

/// Closed set of failures an operation can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// The input is outside the operation's domain.
    #[error("{0}")]
    InvalidInput(String),

    /// A named thing (time zone, country, algorithm) does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A network service or subprocess failed or returned garbage.
    #[error("{0}")]
    ExternalService(String),

    /// Required local configuration is absent or incomplete.
    #[error("{0}")]
    ConfigurationMissing(String),
}

impl OperationError {
    /// Create a new "invalid input" error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new "not found" error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new "external service" error.
    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    /// Create a new "configuration missing" error.
    pub fn configuration_missing(msg: impl Into<String>) -> Self {
        Self::ConfigurationMissing(msg.into())
    }

    /// Whether the failure is reported as data rather than aborting the call.
    pub fn is_soft(&self) -> bool {
        !matches!(self, Self::ConfigurationMissing(_))
    }

    /// Stable identifier of the kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound(_) => "not_found",
            Self::ExternalService(_) => "external_service",
            Self::ConfigurationMissing(_) => "configuration_missing",
        }
    }

    /// Render as the uniform error mapping.
    pub fn to_payload(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

/// Arguments did not match the operation signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("{operation}() takes {expected} argument(s) but {given} were given")]
    TooMany {
        operation: String,
        expected: usize,
        given: usize,
    },

    #[error("{operation}() missing required argument(s): {}", .missing.join(", "))]
    Missing {
        operation: String,
        missing: Vec<String>,
    },

    #[error("{operation}() got an unexpected argument '{name}'")]
    Unexpected { operation: String, name: String },

    #[error("invalid {kind} value for '{name}': {value}")]
    InvalidValue {
        name: String,
        kind: &'static str,
        value: String,
    },
}

/// Errors that can occur while resolving and running a qualified name.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Use <namespace>__<operation> format, e.g. datetime__current (got '{0}')")]
    InvalidName(String),

    #[error("Unknown namespace '{name}'. Available namespaces: {}", .available.join(", "))]
    UnknownNamespace { name: String, available: Vec<String> },

    #[error("Unknown operation '{name}' in '{namespace}'. Available operations: {}", .available.join(", "))]
    UnknownOperation {
        namespace: String,
        name: String,
        available: Vec<String>,
    },

    #[error("Invalid arguments: {0}")]
    Arguments(#[from] ArgumentError),

    #[error("{name} failed: {source}")]
    Failed {
        name: String,
        #[source]
        source: OperationError,
    },
}

impl DispatchError {
    /// Usage errors are the caller's fault; everything else is runtime.
    pub fn is_usage(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Errors raised while building the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Namespace '{0}' is registered twice")]
    DuplicateNamespace(String),

    #[error("Operation '{namespace}__{name}' is registered twice")]
    DuplicateOperation { namespace: String, name: String },

    #[error("Invalid name '{0}': names must be non-empty and must not contain '__'")]
    InvalidName(String),

    #[error("Parameter '{param}' of '{operation}' has a default that is not a valid {kind}")]
    DefaultMismatch {
        operation: String,
        param: String,
        kind: &'static str,
    },

    #[error("Required parameter '{param}' of '{operation}' follows a parameter with a default")]
    RequiredAfterOptional { operation: String, param: String },

    #[error("Parameter '{param}' of '{operation}' is declared twice")]
    DuplicateParameter { operation: String, param: String },
}
