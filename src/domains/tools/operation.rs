//! Operation model: typed parameter lists, argument binding and the
//! handler signature every utility function is adapted to.
//!
//! Operations are plain Rust functions. Each namespace module describes them
//! with an [`OperationDef`] (name, description, [`ParamSpec`]s, handler) so
//! the registry can expose them uniformly to the CLI and the MCP server.

use serde_json::{Map, Number, Value};

use super::error::{ArgumentError, OperationError};
use crate::core::config::Config;

/// Separator between namespace and operation in qualified names.
pub const SEPARATOR: &str = "__";

/// Reserved prefix for members that must never be registered.
pub const RESERVED_PREFIX: char = '_';

/// Result of one operation: a JSON object, or a typed failure.
pub type OpResult = Result<Value, OperationError>;

/// Uniform handler signature. Arguments are already bound and typed.
pub type Handler = fn(&Arguments, &Config) -> OpResult;

/// Primitive parameter types understood by both front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
    Float,
    String,
}

impl ParamKind {
    /// Name used in signatures printed by the CLI listing.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::Float => "float",
            Self::String => "str",
        }
    }

    /// JSON-schema type used for tool input schemas.
    pub fn schema_type(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "number",
            Self::String => "string",
        }
    }

    /// Coerce a raw command-line string to this kind.
    pub fn coerce(self, name: &str, raw: &str) -> Result<Value, ArgumentError> {
        let invalid = || ArgumentError::InvalidValue {
            name: name.to_string(),
            kind: self.type_name(),
            value: raw.to_string(),
        };

        match self {
            Self::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| invalid()),
            // JSON has no infinities or NaN, so those spellings are rejected.
            Self::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(invalid),
            Self::String => Ok(Value::String(raw.to_string())),
        }
    }

    /// Convert a JSON argument (from a protocol call) to this kind.
    ///
    /// Numeric strings are accepted for numeric kinds and scalars are
    /// stringified for string parameters.
    pub fn convert(self, name: &str, value: &Value) -> Result<Value, ArgumentError> {
        let invalid = || ArgumentError::InvalidValue {
            name: name.to_string(),
            kind: self.type_name(),
            value: value.to_string(),
        };

        match (self, value) {
            (_, Value::String(raw)) => self.coerce(name, raw),
            (Self::Integer, Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Value::from(i));
                }
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Ok(Value::from(f as i64))
                    }
                    _ => Err(invalid()),
                }
            }
            (Self::Float, Value::Number(n)) => n
                .as_f64()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(invalid),
            (Self::String, Value::Number(n)) => Ok(Value::String(n.to_string())),
            (Self::String, Value::Bool(b)) => Ok(Value::String(b.to_string())),
            _ => Err(invalid()),
        }
    }

    /// Whether a default value is a valid instance of this kind.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Integer => value.is_i64(),
            Self::Float => value.is_number(),
            Self::String => value.is_string(),
        }
    }
}

/// One declared parameter of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: Option<Value>,
    pub description: &'static str,
}

impl ParamSpec {
    fn new(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            default: None,
            description,
        }
    }

    pub fn int(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Integer, description)
    }

    pub fn float(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Float, description)
    }

    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::String, description)
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Render as `name: type` or `name: type = default`.
    pub fn signature(&self) -> String {
        match &self.default {
            None => format!("{}: {}", self.name, self.kind.type_name()),
            Some(Value::String(s)) => {
                format!("{}: {} = '{}'", self.name, self.kind.type_name(), s)
            }
            Some(default) => format!("{}: {} = {}", self.name, self.kind.type_name(), default),
        }
    }
}

/// Declaration of an operation inside a namespace module.
///
/// Use the [`operation!`](crate::operation) macro so `origin` records the
/// declaring module.
#[derive(Debug, Clone)]
pub struct OperationDef {
    /// Module path the operation was declared in.
    pub origin: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
    pub handler: Handler,
}

impl OperationDef {
    pub fn new(
        origin: &'static str,
        name: &'static str,
        description: &'static str,
        handler: Handler,
    ) -> Self {
        Self {
            origin,
            name,
            description,
            params: Vec::new(),
            handler,
        }
    }

    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// Bind command-line strings positionally, applying defaults.
    pub fn bind_positional(
        &self,
        qualified: &str,
        raw: &[String],
    ) -> Result<Arguments, ArgumentError> {
        if raw.len() > self.params.len() {
            return Err(ArgumentError::TooMany {
                operation: qualified.to_string(),
                expected: self.params.len(),
                given: raw.len(),
            });
        }

        let mut values = Map::new();
        let mut missing = Vec::new();
        for (index, spec) in self.params.iter().enumerate() {
            match (raw.get(index), &spec.default) {
                (Some(arg), _) => {
                    values.insert(spec.name.to_string(), spec.kind.coerce(spec.name, arg)?);
                }
                (None, Some(default)) => {
                    values.insert(spec.name.to_string(), default.clone());
                }
                (None, None) => missing.push(spec.name.to_string()),
            }
        }

        finish_binding(qualified, values, missing)
    }

    /// Bind named JSON arguments, applying defaults. `null` counts as absent.
    pub fn bind_named(
        &self,
        qualified: &str,
        named: &Map<String, Value>,
    ) -> Result<Arguments, ArgumentError> {
        if let Some(unknown) = named
            .keys()
            .find(|key| !self.params.iter().any(|spec| spec.name == key.as_str()))
        {
            return Err(ArgumentError::Unexpected {
                operation: qualified.to_string(),
                name: unknown.clone(),
            });
        }

        let mut values = Map::new();
        let mut missing = Vec::new();
        for spec in &self.params {
            match (named.get(spec.name).filter(|v| !v.is_null()), &spec.default) {
                (Some(value), _) => {
                    values.insert(spec.name.to_string(), spec.kind.convert(spec.name, value)?);
                }
                (None, Some(default)) => {
                    values.insert(spec.name.to_string(), default.clone());
                }
                (None, None) => missing.push(spec.name.to_string()),
            }
        }

        finish_binding(qualified, values, missing)
    }
}

fn finish_binding(
    qualified: &str,
    values: Map<String, Value>,
    missing: Vec<String>,
) -> Result<Arguments, ArgumentError> {
    if missing.is_empty() {
        Ok(Arguments { values })
    } else {
        Err(ArgumentError::Missing {
            operation: qualified.to_string(),
            missing,
        })
    }
}

/// Declare an operation, recording the calling module as its origin.
#[macro_export]
macro_rules! operation {
    ($name:expr, $description:expr, $handler:expr $(,)?) => {
        $crate::domains::tools::OperationDef::new(module_path!(), $name, $description, $handler)
    };
}

/// Bound arguments of one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Map<String, Value>,
}

impl Arguments {
    /// Build arguments directly, bypassing a signature. Used by tests and
    /// by operations that call each other.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn float(&self, name: &str) -> Result<f64, OperationError> {
        self.get(name)
            .and_then(Value::as_f64)
            .ok_or_else(|| missing_typed(name, "float"))
    }

    pub fn int(&self, name: &str) -> Result<i64, OperationError> {
        self.get(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| missing_typed(name, "int"))
    }

    pub fn str(&self, name: &str) -> Result<&str, OperationError> {
        self.get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| missing_typed(name, "str"))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }
}

fn missing_typed(name: &str, kind: &str) -> OperationError {
    OperationError::invalid_input(format!("argument '{}' is not a valid {}", name, kind))
}
