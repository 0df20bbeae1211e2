//! Articles and the form input that creates or revises them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{FieldErrors, PersonName, UserId};

/// Validation errors for article identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleIdError {
    /// The value is not a UUID.
    Invalid,
}

impl fmt::Display for ArticleIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "article id must be a valid UUID")
    }
}

impl std::error::Error for ArticleIdError {}

/// Stable article identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArticleId(Uuid);

impl ArticleId {
    /// Parse an identifier taken from a URL path.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ArticleIdError> {
        Uuid::parse_str(raw.as_ref())
            .map(Self)
            .map_err(|_| ArticleIdError::Invalid)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<ArticleId> for String {
    fn from(value: ArticleId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for ArticleId {
    type Error = ArticleIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Non-blank article text (title or body).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArticleText(String);

impl ArticleText {
    /// Accept `value` unless it is blank. Surrounding whitespace is trimmed.
    pub fn new(value: impl AsRef<str>) -> Option<Self> {
        let trimmed = value.as_ref().trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ArticleText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ArticleText> for String {
    fn from(value: ArticleText) -> Self {
        value.0
    }
}

/// Published article.
///
/// ## Invariants
/// - `title` and `body` are non-blank.
/// - `author` references an existing user; only that user may revise or
///   delete the article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Stable identifier.
    pub id: ArticleId,
    /// Headline shown on the index.
    pub title: ArticleText,
    /// Owning user.
    pub author: UserId,
    /// Article text.
    pub body: ArticleText,
    /// Set once on creation; revisions keep it.
    pub created_at: DateTime<Utc>,
}

impl Article {
    /// `true` when `user` owns the article.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.author == *user
    }
}

/// Article joined with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleWithAuthor {
    /// The stored article.
    pub article: Article,
    /// Display name of [`Article::author`].
    pub author_name: PersonName,
}

/// Raw add-form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDraft {
    /// Submitted title.
    pub title: String,
    /// Submitted body.
    pub body: String,
}

/// Validated add-form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidArticleDraft {
    /// Non-blank title.
    pub title: ArticleText,
    /// Non-blank body.
    pub body: ArticleText,
}

impl ArticleDraft {
    /// Check that title and body are present.
    pub fn validate(self) -> Result<ValidArticleDraft, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = required(&mut errors, "title", &self.title, "Title is required");
        let body = required(&mut errors, "body", &self.body, "Body is required");
        match (title, body) {
            (Some(title), Some(body)) => Ok(ValidArticleDraft { title, body }),
            _ => Err(errors),
        }
    }
}

/// Raw edit-form values. The form carries the author id, so a revision may
/// hand the article to another user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleRevision {
    /// Submitted title.
    pub title: String,
    /// Submitted author id, as text.
    pub author: String,
    /// Submitted body.
    pub body: String,
}

/// Validated edit-form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidArticleRevision {
    /// Non-blank title.
    pub title: ArticleText,
    /// Parsed author id; existence is checked by the service.
    pub author: UserId,
    /// Non-blank body.
    pub body: ArticleText,
}

impl ArticleRevision {
    /// Check that every field is present and the author is a user id.
    pub fn validate(self) -> Result<ValidArticleRevision, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = required(&mut errors, "title", &self.title, "Title is required");
        let author = if errors.require("author", &self.author, "Author is required") {
            UserId::new(self.author.trim())
                .map_err(|_| errors.push("author", "Author not found"))
                .ok()
        } else {
            None
        };
        let body = required(&mut errors, "body", &self.body, "Body is required");
        match (title, author, body) {
            (Some(title), Some(author), Some(body)) => Ok(ValidArticleRevision {
                title,
                author,
                body,
            }),
            _ => Err(errors),
        }
    }
}

fn required(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    message: &str,
) -> Option<ArticleText> {
    let text = ArticleText::new(value);
    if text.is_none() {
        errors.push(field, message);
    }
    text
}
