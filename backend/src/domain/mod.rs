//! Domain primitives, aggregates and use-case services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and
//! persistence adapters, plus the services that enforce ownership and
//! credential rules. Types validate on construction and document their
//! invariants in Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - FieldErrors / CommandError: form validation outcomes.
//! - User and its value types; Article and its form inputs.
//! - AuthService / ArticleService: implementations of the driving ports.

pub mod article;
pub mod article_service;
pub mod auth;
pub mod auth_service;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::article::{
    Article, ArticleDraft, ArticleId, ArticleIdError, ArticleRevision, ArticleText,
    ArticleWithAuthor, ValidArticleDraft, ValidArticleRevision,
};
pub use self::article_service::ArticleService;
pub use self::auth::{
    AuthError, LoginCredentials, LoginValidationError, Registration, RegistrationRequest,
};
pub use self::auth_service::AuthService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, PasswordHash, PersonName, User, UserId, UserProfile, UserValidationError,
    Username,
};
pub use self::validation::{CommandError, FieldError, FieldErrors};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use pressroom::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("Not Authorized"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
