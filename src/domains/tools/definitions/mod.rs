//! Utility namespaces.
//!
//! Each submodule is one namespace; its name becomes the namespace name.
//! A namespace module exposes `namespace()`, which declares its operations
//! with `operation!`. Helpers that are not part of the public surface live
//! in `common` and are never registered.

pub mod common;
pub mod datetime;
pub mod ip_address;
pub mod math;
pub mod text;
pub mod user_information;
pub mod weather;

use super::registry::NamespaceDef;

/// Every namespace the registry discovers.
pub fn catalog() -> Vec<NamespaceDef> {
    vec![
        datetime::namespace(),
        ip_address::namespace(),
        math::namespace(),
        text::namespace(),
        user_information::namespace(),
        weather::namespace(),
    ]
}
