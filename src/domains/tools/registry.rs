//! Tool Registry - discovery and registration of every operation.
//!
//! Each namespace module under `definitions/` hands back a [`NamespaceDef`];
//! the registry turns that catalog into a read-only
//! `namespace -> operation -> Operation` mapping:
//! - namespaces and operations starting with `_` are skipped
//! - operations declared outside the namespace module are skipped, so a
//!   helper re-exported from another namespace is never registered twice
//! - malformed declarations fail the whole build
//!
//! Both maps are ordered, so listing order is stable across runs.

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::definitions;
use super::dispatch::{Outcome, QualifiedName};
use super::error::{DispatchError, RegistryError};
use super::operation::{Arguments, OpResult, OperationDef, ParamSpec, RESERVED_PREFIX, SEPARATOR};
use crate::core::config::Config;

// ============================================================================
// Declarations
// ============================================================================

/// Declaration of one namespace, as produced by a definitions module.
#[derive(Debug, Clone)]
pub struct NamespaceDef {
    pub name: String,
    /// Module path the namespace was declared in.
    pub module: &'static str,
    pub description: &'static str,
    pub operations: Vec<OperationDef>,
}

impl NamespaceDef {
    /// Declare a namespace named after its module (the last path segment).
    pub fn from_module(module: &'static str, description: &'static str) -> Self {
        let name = module.rsplit("::").next().unwrap_or(module).to_string();
        Self {
            name,
            module,
            description,
            operations: Vec::new(),
        }
    }

    pub fn operation(mut self, def: OperationDef) -> Self {
        self.operations.push(def);
        self
    }

    /// Whether `origin` is this namespace's module or one of its submodules.
    pub fn owns(&self, origin: &str) -> bool {
        origin == self.module
            || origin
                .strip_prefix(self.module)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

// ============================================================================
// Registered entries
// ============================================================================

/// A registered, invocable operation.
#[derive(Debug, Clone)]
pub struct Operation {
    namespace: String,
    namespace_description: &'static str,
    def: OperationDef,
}

impl Operation {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        self.def.name
    }

    pub fn description(&self) -> &str {
        self.def.description
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.def.params
    }

    pub fn definition(&self) -> &OperationDef {
        &self.def
    }

    /// `namespace__operation`, unique across the registry.
    pub fn qualified_name(&self) -> String {
        format!("{}{}{}", self.namespace, SEPARATOR, self.def.name)
    }

    /// `ns__op(a: float, b: float = 10.0)`.
    pub fn signature(&self) -> String {
        let params: Vec<_> = self.def.params.iter().map(ParamSpec::signature).collect();
        format!("{}({})", self.qualified_name(), params.join(", "))
    }

    /// Description handed to the protocol layer.
    pub fn protocol_description(&self) -> String {
        if self.namespace_description.is_empty() {
            self.def.description.to_string()
        } else {
            format!(
                "[{}] {}\n{}",
                self.namespace, self.namespace_description, self.def.description
            )
        }
    }

    /// Run the handler on already-bound arguments.
    #[instrument(skip_all, fields(tool = %self.qualified_name()))]
    pub fn call(&self, args: &Arguments, config: &Config) -> OpResult {
        debug!("Invoking with {:?}", args.as_map());
        let result = (self.def.handler)(args, config);
        if let Err(e) = &result {
            warn!(kind = e.kind(), "Operation failed: {}", e);
        }
        result
    }

    /// Run the handler and split the result into soft/hard outcomes.
    pub fn run(&self, args: &Arguments, config: &Config) -> Result<Outcome, DispatchError> {
        match self.call(args, config) {
            Ok(payload) => Ok(Outcome::Success(payload)),
            Err(e) if e.is_soft() => Ok(Outcome::SoftFailure(e.to_payload())),
            Err(source) => Err(DispatchError::Failed {
                name: self.qualified_name(),
                source,
            }),
        }
    }
}

/// A registered namespace and its operations.
#[derive(Debug, Clone)]
pub struct Namespace {
    name: String,
    description: &'static str,
    operations: BTreeMap<String, Operation>,
}

impl Namespace {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        self.description
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    pub fn operation_names(&self) -> Vec<String> {
        self.operations.keys().cloned().collect()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Process-wide, read-only tool registry.
#[derive(Debug, Clone)]
pub struct Registry {
    namespaces: BTreeMap<String, Namespace>,
}

impl Registry {
    /// Build the registry from every namespace under `definitions/`.
    pub fn build() -> Result<Self, RegistryError> {
        Self::discover(definitions::catalog())
    }

    /// Build a registry from an explicit catalog.
    pub fn discover(defs: Vec<NamespaceDef>) -> Result<Self, RegistryError> {
        let mut namespaces = BTreeMap::new();

        for ns_def in defs {
            if ns_def.name.starts_with(RESERVED_PREFIX) {
                debug!("Skipping private namespace '{}'", ns_def.name);
                continue;
            }
            validate_name(&ns_def.name)?;
            if namespaces.contains_key(&ns_def.name) {
                return Err(RegistryError::DuplicateNamespace(ns_def.name));
            }

            let mut operations = BTreeMap::new();
            for def in &ns_def.operations {
                if def.name.starts_with(RESERVED_PREFIX) {
                    debug!("Skipping private operation '{}' in '{}'", def.name, ns_def.name);
                    continue;
                }
                if !ns_def.owns(def.origin) {
                    debug!(
                        "Skipping '{}' in '{}': declared in {}",
                        def.name, ns_def.name, def.origin
                    );
                    continue;
                }
                validate_name(def.name)?;
                validate_params(&ns_def.name, def)?;
                if operations.contains_key(def.name) {
                    return Err(RegistryError::DuplicateOperation {
                        namespace: ns_def.name.clone(),
                        name: def.name.to_string(),
                    });
                }
                operations.insert(
                    def.name.to_string(),
                    Operation {
                        namespace: ns_def.name.clone(),
                        namespace_description: ns_def.description,
                        def: def.clone(),
                    },
                );
            }

            if operations.is_empty() {
                debug!("Namespace '{}' has no public operations", ns_def.name);
                continue;
            }

            namespaces.insert(
                ns_def.name.clone(),
                Namespace {
                    name: ns_def.name,
                    description: ns_def.description,
                    operations,
                },
            );
        }

        let registry = Self { namespaces };
        debug!(
            "Registered {} operations in {} namespaces",
            registry.operations().count(),
            registry.namespaces.len()
        );
        Ok(registry)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.values()
    }

    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    pub fn namespace_names(&self) -> Vec<String> {
        self.namespaces.keys().cloned().collect()
    }

    /// All operations, namespace by namespace.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.namespaces.values().flat_map(Namespace::operations)
    }

    /// All qualified tool names.
    pub fn tool_names(&self) -> Vec<String> {
        self.operations().map(Operation::qualified_name).collect()
    }

    /// Resolve a parsed name, reporting the valid alternatives on failure.
    pub fn resolve(&self, name: &QualifiedName) -> Result<&Operation, DispatchError> {
        let namespace =
            self.namespaces
                .get(&name.namespace)
                .ok_or_else(|| DispatchError::UnknownNamespace {
                    name: name.namespace.clone(),
                    available: self.namespace_names(),
                })?;

        namespace
            .operation(&name.operation)
            .ok_or_else(|| DispatchError::UnknownOperation {
                namespace: name.namespace.clone(),
                name: name.operation.clone(),
                available: namespace.operation_names(),
            })
    }

    /// Look up by qualified string (`ns__op` or `ns.op`).
    pub fn lookup(&self, qualified: &str) -> Result<&Operation, DispatchError> {
        self.resolve(&QualifiedName::parse(qualified)?)
    }

    /// Invoke with named JSON arguments (the protocol path).
    pub fn invoke(
        &self,
        qualified: &str,
        named: &Map<String, Value>,
        config: &Config,
    ) -> Result<Outcome, DispatchError> {
        let operation = self.lookup(qualified)?;
        let args = operation
            .definition()
            .bind_named(&operation.qualified_name(), named)?;
        operation.run(&args, config)
    }
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() || name.contains(SEPARATOR) || name.contains('.') {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn validate_params(namespace: &str, def: &OperationDef) -> Result<(), RegistryError> {
    let operation = format!("{}{}{}", namespace, SEPARATOR, def.name);
    let mut seen = HashSet::new();
    let mut optional_seen = false;

    for spec in &def.params {
        if !seen.insert(spec.name) {
            return Err(RegistryError::DuplicateParameter {
                operation,
                param: spec.name.to_string(),
            });
        }
        match &spec.default {
            Some(default) if !spec.kind.accepts(default) => {
                return Err(RegistryError::DefaultMismatch {
                    operation,
                    param: spec.name.to_string(),
                    kind: spec.kind.type_name(),
                });
            }
            Some(_) => optional_seen = true,
            None if optional_seen => {
                return Err(RegistryError::RequiredAfterOptional {
                    operation,
                    param: spec.name.to_string(),
                });
            }
            None => {}
        }
    }
    Ok(())
}
