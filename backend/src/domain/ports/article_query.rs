//! Driving port for reading articles.

use async_trait::async_trait;

use crate::domain::{Article, ArticleId, ArticleWithAuthor, Error, UserId};

/// Article reads for the index, detail and edit pages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleQuery: Send + Sync {
    /// Every article, oldest first.
    async fn list(&self) -> Result<Vec<Article>, Error>;

    /// One article; `NotFound` when absent.
    async fn get(&self, id: &ArticleId) -> Result<Article, Error>;

    /// One article the requester is allowed to edit.
    ///
    /// `NotFound` when absent, `Forbidden` when `requester` is not the owner.
    async fn get_owned(&self, id: &ArticleId, requester: &UserId) -> Result<Article, Error>;

    /// One article with its author's name; `NotFound` when either is absent.
    async fn get_with_author(&self, id: &ArticleId) -> Result<ArticleWithAuthor, Error>;
}
