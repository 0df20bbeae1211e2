//! Account service implementing the [`AccountService`] driving port.
//!
//! Registration validates the form, rejects taken usernames and stores the
//! Argon2 hash produced by the [`PasswordHasher`]. Credential checks return
//! [`AuthError`] so the login form can show which check failed without the
//! transport layer inspecting store errors.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountService, PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthError, CommandError, Error, FieldErrors, LoginCredentials, PasswordHash,
    RegistrationRequest, User, UserId,
};

const USERNAME_TAKEN: &str = "Username is already taken";

/// Account service backed by a user repository and a password hasher.
pub struct AuthService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> Clone for AuthService<U, H> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            hasher: Arc::clone(&self.hasher),
        }
    }
}

impl<U, H> AuthService<U, H> {
    /// Create a service over the given adapters.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { username } => {
            Error::internal(format!("unexpected duplicate username: {username}"))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn taken_username() -> CommandError {
    let mut errors = FieldErrors::default();
    errors.push("username", USERNAME_TAKEN);
    CommandError::Validation(errors)
}

impl<U, H> AuthService<U, H>
where
    H: PasswordHasher + 'static,
{
    async fn hash_password(&self, password: Zeroizing<String>) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hash_error)
    }

    async fn verify_password(&self, password: &str, hash: PasswordHash) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(password.as_str(), &hash))
            .await
            .map_err(|err| Error::internal(format!("password check task failed: {err}")))?
            .map_err(map_hash_error)
    }
}

#[async_trait]
impl<U, H> AccountService for AuthService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegistrationRequest) -> Result<UserId, CommandError> {
        let registration = request.validate()?;

        let existing = self
            .users
            .find_by_username(&registration.username)
            .await
            .map_err(map_user_error)?;
        if existing.is_some() {
            debug!(username = %registration.username, "registration rejected: username taken");
            return Err(taken_username());
        }

        let password_hash = self.hash_password(registration.password).await?;
        let user = User::new(
            UserId::random(),
            registration.name,
            registration.email,
            registration.username,
            password_hash,
        );
        match self.users.insert(&user).await {
            Ok(()) => Ok(*user.id()),
            Err(UserPersistenceError::DuplicateUsername { .. }) => Err(taken_username()),
            Err(other) => Err(map_user_error(other).into()),
        }
    }

    async fn verify_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<UserId, AuthError> {
        let user = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(|err| AuthError::Unavailable(map_user_error(err)))?;
        let Some(user) = user else {
            debug!(username = %credentials.username(), "login rejected: no such user");
            return Err(AuthError::NoSuchUser);
        };

        let matches = self
            .verify_password(credentials.password(), user.password_hash().clone())
            .await
            .map_err(AuthError::Unavailable)?;
        if matches {
            Ok(*user.id())
        } else {
            debug!(username = %credentials.username(), "login rejected: wrong password");
            Err(AuthError::WrongPassword)
        }
    }

    async fn current_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(map_user_error)
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
