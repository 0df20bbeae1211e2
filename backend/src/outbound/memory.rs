//! In-process repositories used when no database is configured and by the
//! HTTP tests.
//!
//! State lives behind a `std::sync::Mutex`; no lock is held across an
//! `.await`. A poisoned lock surfaces as a query error rather than a panic.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    ArticlePersistenceError, ArticleRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{Article, ArticleId, User, UserId, Username};

/// Users keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    store: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, User>>, UserPersistenceError> {
        self.store
            .lock()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut guard = self.lock()?;
        if guard
            .values()
            .any(|existing| existing.username() == user.username())
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        guard.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()?
            .values()
            .find(|user| user.username() == username)
            .cloned())
    }
}

/// Articles in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryArticleRepository {
    store: Mutex<Vec<Article>>,
}

impl InMemoryArticleRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Article>>, ArticlePersistenceError> {
        self.store
            .lock()
            .map_err(|_| ArticlePersistenceError::query("article store lock poisoned"))
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn list(&self) -> Result<Vec<Article>, ArticlePersistenceError> {
        Ok(self.lock()?.clone())
    }

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, ArticlePersistenceError> {
        Ok(self.lock()?.iter().find(|article| article.id == *id).cloned())
    }

    async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError> {
        let mut guard = self.lock()?;
        if guard.iter().any(|existing| existing.id == article.id) {
            return Err(ArticlePersistenceError::query("duplicate article id"));
        }
        guard.push(article.clone());
        Ok(())
    }

    async fn update(&self, article: &Article) -> Result<bool, ArticlePersistenceError> {
        let mut guard = self.lock()?;
        let Some(slot) = guard.iter_mut().find(|existing| existing.id == article.id) else {
            return Ok(false);
        };
        slot.title = article.title.clone();
        slot.author = article.author;
        slot.body = article.body.clone();
        Ok(true)
    }

    async fn delete(&self, id: &ArticleId) -> Result<bool, ArticlePersistenceError> {
        let mut guard = self.lock()?;
        let before = guard.len();
        guard.retain(|article| article.id != *id);
        Ok(guard.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArticleText, EmailAddress, PasswordHash, PersonName};
    use chrono::Utc;
    use rstest::rstest;

    fn user(username: &str) -> User {
        User::new(
            UserId::random(),
            PersonName::new("Someone").expect("name"),
            EmailAddress::new("someone@example.com").expect("email"),
            Username::new(username).expect("username"),
            PasswordHash::new("$argon2id$stub").expect("hash"),
        )
    }

    fn article(title: &str) -> Article {
        Article {
            id: ArticleId::random(),
            title: ArticleText::new(title).expect("title"),
            author: UserId::random(),
            body: ArticleText::new("body").expect("body"),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn usernames_are_unique() {
        let repo = InMemoryUserRepository::new();
        repo.insert(&user("ada")).await.expect("first insert");

        let err = repo.insert(&user("ada")).await.expect_err("duplicate");
        assert_eq!(err, UserPersistenceError::duplicate_username("ada"));
    }

    #[rstest]
    #[tokio::test]
    async fn users_are_found_by_username() {
        let repo = InMemoryUserRepository::new();
        let ada = user("ada");
        repo.insert(&ada).await.expect("insert");

        let found = repo
            .find_by_username(ada.username())
            .await
            .expect("lookup");
        assert_eq!(found.as_ref().map(User::id), Some(ada.id()));
    }

    #[rstest]
    #[tokio::test]
    async fn articles_keep_insertion_order() {
        let repo = InMemoryArticleRepository::new();
        for title in ["first", "second", "third"] {
            repo.insert(&article(title)).await.expect("insert");
        }

        let titles: Vec<String> = repo
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|article| String::from(article.title))
            .collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[rstest]
    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let repo = InMemoryArticleRepository::new();
        let stored = article("kept");
        repo.insert(&stored).await.expect("insert");

        assert!(!repo.update(&article("ghost")).await.expect("update"));
        assert!(repo.delete(&stored.id).await.expect("delete"));
        assert!(!repo.delete(&stored.id).await.expect("second delete"));
    }
}
