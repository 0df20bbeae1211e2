//! Field-level validation failures shared by the registration and article
//! use-cases.
//!
//! Messages are user-facing and rendered back into the submitted form, so
//! they keep the order in which the checks ran.

use serde::Serialize;
use serde_json::json;

use super::Error;

/// One failed check against a named form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    field: &'static str,
    message: String,
}

impl FieldError {
    /// Name of the offending form field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Human-readable explanation.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Ordered collection of [`FieldError`]s.
///
/// # Examples
/// ```
/// use pressroom::domain::FieldErrors;
///
/// let mut errors = FieldErrors::default();
/// errors.push("title", "Title is required");
/// assert!(errors.has("title", "Title is required"));
/// assert!(errors.clone().into_result(()).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Record a failed check.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record `message` against `field` when `value` is blank.
    pub fn require(&mut self, field: &'static str, value: &str, message: &str) -> bool {
        let present = !value.trim().is_empty();
        if !present {
            self.push(field, message);
        }
        present
    }

    /// `true` when no check failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over failures in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `true` when `field` failed with exactly `message`.
    pub fn has(&self, field: &str, message: &str) -> bool {
        self.0
            .iter()
            .any(|error| error.field == field && error.message == message)
    }

    /// Turn the collection into `Ok(value)` when empty, `Err(self)` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl From<FieldErrors> for Error {
    fn from(value: FieldErrors) -> Self {
        Self::invalid_request("validation failed").with_details(json!({ "errors": value }))
    }
}

/// Outcome of a use-case that validates form input before touching a store.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Input failed one or more field checks; nothing was persisted.
    Validation(FieldErrors),
    /// The command was rejected or a store failed.
    Failed(Error),
}

impl CommandError {
    /// Field errors when this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Failed(_) => None,
        }
    }
}

impl From<Error> for CommandError {
    fn from(value: Error) -> Self {
        Self::Failed(value)
    }
}

impl From<FieldErrors> for CommandError {
    fn from(value: FieldErrors) -> Self {
        Self::Validation(value)
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "validation failed: {errors}"),
            Self::Failed(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for CommandError {}
