//! Driving port for article mutations.
//!
//! Each mutation checks ownership against the stored article before it
//! writes. Validation failures come back as [`CommandError::Validation`] so
//! the form can be rendered again.

use async_trait::async_trait;

use crate::domain::{Article, ArticleDraft, ArticleId, ArticleRevision, CommandError, Error, UserId};

/// Article mutations with ownership enforcement.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleCommand: Send + Sync {
    /// Publish a new article owned by `author`.
    async fn create(&self, author: &UserId, draft: ArticleDraft) -> Result<Article, CommandError>;

    /// Replace title, author and body of an article owned by `requester`.
    async fn update(
        &self,
        id: &ArticleId,
        requester: &UserId,
        revision: ArticleRevision,
    ) -> Result<Article, CommandError>;

    /// Remove an article owned by `requester`.
    ///
    /// `Unauthorized` without a requester, then `NotFound`, then `Forbidden`.
    async fn delete(&self, id: &ArticleId, requester: Option<UserId>) -> Result<(), Error>;
}
