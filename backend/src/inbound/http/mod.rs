//! HTTP inbound adapter serving the article pages.

pub mod articles;
pub mod error;
pub mod flash;
pub mod guard;
pub mod health;
pub mod page;
pub mod routes;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
