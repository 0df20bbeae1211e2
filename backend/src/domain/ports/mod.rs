//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`AccountService`, `ArticleQuery`, `ArticleCommand`) are
//! called by inbound adapters. Driven ports (`UserRepository`,
//! `ArticleRepository`, `PasswordHasher`) are implemented by outbound
//! adapters and expose typed errors built with [`define_port_error`].

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod article_command;
mod article_query;
mod article_repository;
mod password_hasher;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::AccountService;
#[cfg(test)]
pub use article_command::MockArticleCommand;
pub use article_command::ArticleCommand;
#[cfg(test)]
pub use article_query::MockArticleQuery;
pub use article_query::ArticleQuery;
#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::{ArticlePersistenceError, ArticleRepository};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
