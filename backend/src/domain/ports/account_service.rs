//! Driving port for account use-cases: registration, credential checks and
//! identity restore.
//!
//! HTTP handlers depend on this trait rather than on the repositories so
//! handler tests can swap in a double without wiring persistence.

use async_trait::async_trait;

use crate::domain::{
    AuthError, CommandError, Error, LoginCredentials, RegistrationRequest, User, UserId,
};

/// Account use-cases consumed by the page handlers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Validate the form, hash the password and store a new user.
    ///
    /// Registration never logs the user in.
    async fn register(&self, request: RegistrationRequest) -> Result<UserId, CommandError>;

    /// Check a username/password pair.
    async fn verify_credentials(&self, credentials: &LoginCredentials)
    -> Result<UserId, AuthError>;

    /// Load the user bound to a session, if it still exists.
    async fn current_user(&self, id: &UserId) -> Result<Option<User>, Error>;
}
