//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: in-process repositories for development and tests.
//! - **password**: Argon2id password hashing.
//!
//! Adapters translate between domain types and infrastructure
//! representations and contain no business logic.

pub mod memory;
pub mod password;
pub mod persistence;
