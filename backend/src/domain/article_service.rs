//! Article service implementing the [`ArticleQuery`] and [`ArticleCommand`]
//! driving ports.
//!
//! Every mutation reloads the stored article and compares its owner with the
//! requester before writing. Checks run in a fixed order: input validation,
//! existence, ownership, then author existence for revisions.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::auth_service::map_user_error;
use crate::domain::ports::{
    ArticleCommand, ArticlePersistenceError, ArticleQuery, ArticleRepository, UserRepository,
};
use crate::domain::{
    Article, ArticleDraft, ArticleId, ArticleRevision, ArticleWithAuthor, CommandError, Error,
    FieldErrors, UserId,
};

pub(crate) const ARTICLE_NOT_FOUND: &str = "Article not found";
pub(crate) const NOT_AUTHORIZED: &str = "Not Authorized";

/// Article service backed by the article and user repositories.
pub struct ArticleService<A, U> {
    articles: Arc<A>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<A, U> Clone for ArticleService<A, U> {
    fn clone(&self) -> Self {
        Self {
            articles: Arc::clone(&self.articles),
            users: Arc::clone(&self.users),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<A, U> ArticleService<A, U> {
    /// Create a service over the given repositories. `clock` stamps new
    /// articles.
    pub fn new(articles: Arc<A>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            articles,
            users,
            clock,
        }
    }
}

fn map_article_error(error: ArticlePersistenceError) -> Error {
    match error {
        ArticlePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("article repository unavailable: {message}"))
        }
        ArticlePersistenceError::Query { message } => {
            Error::internal(format!("article repository error: {message}"))
        }
    }
}

impl<A, U> ArticleService<A, U>
where
    A: ArticleRepository,
    U: UserRepository,
{
    async fn load(&self, id: &ArticleId) -> Result<Article, Error> {
        self.articles
            .find_by_id(id)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found(ARTICLE_NOT_FOUND))
    }

    async fn load_owned(&self, id: &ArticleId, requester: &UserId) -> Result<Article, Error> {
        let article = self.load(id).await?;
        if article.is_owned_by(requester) {
            Ok(article)
        } else {
            debug!(article = %id, requester = %requester, "ownership check failed");
            Err(Error::forbidden(NOT_AUTHORIZED))
        }
    }

    async fn user_exists(&self, id: &UserId) -> Result<bool, Error> {
        self.users
            .find_by_id(id)
            .await
            .map(|user| user.is_some())
            .map_err(map_user_error)
    }
}

#[async_trait]
impl<A, U> ArticleQuery for ArticleService<A, U>
where
    A: ArticleRepository,
    U: UserRepository,
{
    async fn list(&self) -> Result<Vec<Article>, Error> {
        self.articles.list().await.map_err(map_article_error)
    }

    async fn get(&self, id: &ArticleId) -> Result<Article, Error> {
        self.load(id).await
    }

    async fn get_owned(&self, id: &ArticleId, requester: &UserId) -> Result<Article, Error> {
        self.load_owned(id, requester).await
    }

    async fn get_with_author(&self, id: &ArticleId) -> Result<ArticleWithAuthor, Error> {
        let article = self.load(id).await?;
        let author = self
            .users
            .find_by_id(&article.author)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("Author not found"))?;
        Ok(ArticleWithAuthor {
            author_name: author.name().clone(),
            article,
        })
    }
}

#[async_trait]
impl<A, U> ArticleCommand for ArticleService<A, U>
where
    A: ArticleRepository,
    U: UserRepository,
{
    async fn create(&self, author: &UserId, draft: ArticleDraft) -> Result<Article, CommandError> {
        let draft = draft.validate()?;
        let article = Article {
            id: ArticleId::random(),
            title: draft.title,
            author: *author,
            body: draft.body,
            created_at: self.clock.utc(),
        };
        self.articles
            .insert(&article)
            .await
            .map_err(map_article_error)?;
        Ok(article)
    }

    async fn update(
        &self,
        id: &ArticleId,
        requester: &UserId,
        revision: ArticleRevision,
    ) -> Result<Article, CommandError> {
        let revision = revision.validate()?;
        let current = self.load_owned(id, requester).await?;

        if revision.author != current.author && !self.user_exists(&revision.author).await? {
            let mut errors = FieldErrors::default();
            errors.push("author", "Author not found");
            return Err(errors.into());
        }

        let updated = Article {
            title: revision.title,
            author: revision.author,
            body: revision.body,
            ..current
        };
        let stored = self
            .articles
            .update(&updated)
            .await
            .map_err(map_article_error)?;
        if stored {
            Ok(updated)
        } else {
            Err(Error::not_found(ARTICLE_NOT_FOUND).into())
        }
    }

    async fn delete(&self, id: &ArticleId, requester: Option<UserId>) -> Result<(), Error> {
        let Some(requester) = requester else {
            return Err(Error::unauthorized("Please login"));
        };
        self.load_owned(id, &requester).await?;
        let removed = self
            .articles
            .delete(id)
            .await
            .map_err(map_article_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found(ARTICLE_NOT_FOUND))
        }
    }
}

#[cfg(test)]
#[path = "article_service_tests.rs"]
mod tests;
