//! Domains module containing business logic organized by bounded contexts.
//!
//! The server currently has a single domain, `tools`: the utility
//! operations and the machinery that exposes them.

pub mod tools;
