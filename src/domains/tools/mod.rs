//! Tools domain module.
//!
//! This module handles every utility operation exposed by the server and
//! the CLI. Operations are plain functions grouped into namespaces; the
//! registry exposes them uniformly to both front-ends.
//!
//! ## Architecture
//!
//! - `definitions/` - Utility namespaces (one module per namespace)
//! - `operation.rs` - Parameter specs, argument binding, handler signature
//! - `registry.rs` - Discovery and registration of every operation
//! - `dispatch.rs` - Qualified names and positional (CLI) dispatch
//! - `router.rs` - rmcp ToolRouter built from the registry
//! - `error.rs` - Operation, argument, dispatch and registry errors
//!
//! ## Adding a New Operation
//!
//! 1. Write the function in the namespace module under `definitions/`
//! 2. Declare it with `operation!` in that namespace's `namespace()`
//!
//! A new namespace additionally needs one line in `definitions::catalog()`.
//! **Nothing else changes:** the CLI, MCP router and HTTP dispatch all read
//! the registry.

pub mod definitions;
mod dispatch;
mod error;
mod operation;
mod registry;
pub mod router;

pub use dispatch::{Dispatcher, Outcome, QualifiedName, render_json};
pub use error::{ArgumentError, DispatchError, OperationError, RegistryError};
pub use operation::{
    Arguments, Handler, OpResult, OperationDef, ParamKind, ParamSpec, RESERVED_PREFIX, SEPARATOR,
};
pub use registry::{Namespace, NamespaceDef, Operation, Registry};
pub use router::build_tool_router;
