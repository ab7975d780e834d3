//! Schema introspection and SQL translation for SQL Anywhere servers.
//!
//! [`DialectContext`](context::DialectContext) is the entry point: it probes the
//! server's version family, loads and caches table descriptors from the `SYS`
//! catalog and renders engine-specific SQL through a [`Dialect`](dialect::Dialect).

pub mod catalog;
pub mod config;
pub mod context;
pub mod data_types;
pub mod dialect;
pub mod executor;
pub mod schema;

#[cfg(test)]
pub(crate) mod testutils;
