//! # Corkboard Shared Library
//!
//! This crate contains shared types, utilities, and business logic used by
//! the Corkboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication and authorization utilities
//! - `db`: Connection pool and migrations
//! - `reorder`: Pure drag-and-drop reorder engine
//! - `board`: Nested board snapshot assembly

pub mod auth;
pub mod board;
pub mod db;
pub mod models;
pub mod reorder;

/// Current version of the Corkboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
