//! Driven port for article storage.
//!
//! Ownership checks live in the domain service; the repository only stores
//! and retrieves rows.

use async_trait::async_trait;

use crate::domain::{Article, ArticleId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by article repository adapters.
    pub enum ArticlePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "article repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "article repository query failed: {message}",
    }
}

/// Article storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// All articles in creation order.
    async fn list(&self) -> Result<Vec<Article>, ArticlePersistenceError>;

    /// Fetch one article.
    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, ArticlePersistenceError>;

    /// Store a new article.
    async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError>;

    /// Replace title, author and body of an existing article.
    ///
    /// Returns `false` when no article has that id.
    async fn update(&self, article: &Article) -> Result<bool, ArticlePersistenceError>;

    /// Remove an article. Returns `false` when it did not exist.
    async fn delete(&self, id: &ArticleId) -> Result<bool, ArticlePersistenceError>;
}
