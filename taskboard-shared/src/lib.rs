//! # Taskboard Shared Library
//!
//! This crate contains the domain types, validation rules, storage ports and
//! services used by the Taskboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Account and task records and their database operations
//! - `validation`: Schema-driven validation of submitted forms
//! - `auth`: Password hashing and session tokens
//! - `store`: Repository ports with Postgres and in-memory adapters
//! - `services`: Owner-scoped task lifecycle and account operations
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;
pub mod validation;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
