//! PostgreSQL-backed `ArticleRepository` implementation using Diesel ORM.
//!
//! Update and delete are single statements keyed by id, so each one is
//! atomic per article.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ArticlePersistenceError, ArticleRepository};
use crate::domain::{Article, ArticleId, ArticleText, UserId};

use super::error_mapping::{DieselFailure, classify_diesel_error, map_pool_error};
use super::models::{ArticleRow, ArticleUpdate, NewArticleRow};
use super::pool::DbPool;
use super::schema::articles;

/// Diesel-backed implementation of the [`ArticleRepository`] port.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ArticlePersistenceError {
    match classify_diesel_error(&error) {
        DieselFailure::Connection(message) => ArticlePersistenceError::connection(message),
        DieselFailure::UniqueViolation => ArticlePersistenceError::query("duplicate article id"),
        DieselFailure::Query(message) => ArticlePersistenceError::query(message),
    }
}

fn row_to_article(row: ArticleRow) -> Result<Article, ArticlePersistenceError> {
    let blank = |column: &str| {
        ArticlePersistenceError::query(format!("stored article {} has a blank {column}", row.id))
    };
    Ok(Article {
        id: ArticleId::from_uuid(row.id),
        title: ArticleText::new(&row.title).ok_or_else(|| blank("title"))?,
        author: UserId::from_uuid(row.author_id),
        body: ArticleText::new(&row.body).ok_or_else(|| blank("body"))?,
        created_at: row.created_at,
    })
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn list(&self) -> Result<Vec<Article>, ArticlePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ArticlePersistenceError::connection))?;

        let rows: Vec<ArticleRow> = articles::table
            .order((articles::created_at.asc(), articles::id.asc()))
            .select(ArticleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_article).collect()
    }

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ArticlePersistenceError::connection))?;

        let row: Option<ArticleRow> = articles::table
            .filter(articles::id.eq(id.as_uuid()))
            .select(ArticleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_article).transpose()
    }

    async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ArticlePersistenceError::connection))?;

        let row = NewArticleRow {
            id: *article.id.as_uuid(),
            title: article.title.as_ref(),
            author_id: *article.author.as_uuid(),
            body: article.body.as_ref(),
            created_at: article.created_at,
        };
        diesel::insert_into(articles::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, article: &Article) -> Result<bool, ArticlePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ArticlePersistenceError::connection))?;

        let changes = ArticleUpdate {
            title: article.title.as_ref(),
            author_id: *article.author.as_uuid(),
            body: article.body.as_ref(),
        };
        let affected = diesel::update(articles::table.filter(articles::id.eq(article.id.as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: &ArticleId) -> Result<bool, ArticlePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ArticlePersistenceError::connection))?;

        let affected = diesel::delete(articles::table.filter(articles::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}
