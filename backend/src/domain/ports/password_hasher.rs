//! Driven port for one-way password hashing.
//!
//! Hashing is CPU bound and synchronous; callers decide whether to move it
//! off the async executor.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// The hash could not be produced.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash is not in a recognised format.
        Malformed { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Salted one-way hashing of account passwords.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash of `password`.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// `Ok(true)` when `password` matches `hash`.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}
