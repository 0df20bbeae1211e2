//! Authentication primitives: login credentials, credential failures, and
//! registration input.
//!
//! Inbound payload parsing stays outside the domain; these constructors
//! validate raw strings before a handler talks to a port.

use std::fmt;

use zeroize::Zeroizing;

use super::{EmailAddress, Error, FieldErrors, PersonName, UserValidationError, Username};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use pressroom::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "s3cret").unwrap();
/// assert_eq!(creds.username().as_ref(), "ada");
/// assert_eq!(creds.password(), "s3cret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = Username::new(username).map_err(|_| LoginValidationError::EmptyUsername)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for the account lookup.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Reasons a credential check fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    /// No account is registered under the username.
    #[error("no such user")]
    NoSuchUser,
    /// The password does not match the stored hash.
    #[error("wrong password")]
    WrongPassword,
    /// A backing store or the hasher failed.
    #[error("credential check failed: {0}")]
    Unavailable(Error),
}

impl AuthError {
    /// Human-readable note shown on the login form.
    pub fn note(&self) -> &'static str {
        match self {
            Self::NoSuchUser => "No user found",
            Self::WrongPassword => "Wrong password",
            Self::Unavailable(_) => "Login is temporarily unavailable",
        }
    }
}

/// Raw registration form values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// Display name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Requested login handle.
    pub username: String,
    /// Chosen password, wiped on drop.
    pub password: Zeroizing<String>,
    /// Repeat of the password.
    pub password_confirmation: Zeroizing<String>,
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Registration input that passed every field check.
#[derive(Clone)]
pub struct Registration {
    /// Display name.
    pub name: PersonName,
    /// Well-formed contact address.
    pub email: EmailAddress,
    /// Login handle; uniqueness is checked on insert.
    pub username: Username,
    /// Plaintext password, hashed before storage.
    pub password: Zeroizing<String>,
}

impl RegistrationRequest {
    /// Run the field checks in form order.
    ///
    /// A confirmation that differs from the password always reports
    /// "Passwords do not match", even when it is also missing.
    pub fn validate(self) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = PersonName::new(&self.name)
            .map_err(|_| errors.push("name", "Name is required"))
            .ok();
        let email = match EmailAddress::new(&self.email) {
            Ok(email) => Some(email),
            Err(UserValidationError::EmptyEmail) => {
                errors.push("email", "Email is required");
                None
            }
            Err(_) => {
                errors.push("email", "Email is not valid");
                None
            }
        };
        let username = Username::new(&self.username)
            .map_err(|_| errors.push("username", "Username is required"))
            .ok();
        // Passwords are taken verbatim, as at login: only an empty one is missing.
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }
        if self.password_confirmation.is_empty() {
            errors.push("password2", "Confirm password is required");
        }
        if *self.password_confirmation != *self.password {
            errors.push("password2", "Passwords do not match");
        }

        match (name, email, username) {
            (Some(name), Some(email), Some(username)) if errors.is_empty() => Ok(Registration {
                name,
                email,
                username,
                password: self.password,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = LoginCredentials::try_from_parts("ada", "  spaced  ").expect("valid");
        assert_eq!(creds.password(), "  spaced  ");
    }

    #[rstest]
    #[case(AuthError::NoSuchUser, "No user found")]
    #[case(AuthError::WrongPassword, "Wrong password")]
    fn auth_errors_carry_form_notes(#[case] error: AuthError, #[case] note: &str) {
        assert_eq!(error.note(), note);
    }

    #[fixture]
    fn request() -> RegistrationRequest {
        RegistrationRequest {
            name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            username: "ada".to_owned(),
            password: Zeroizing::new("engine".to_owned()),
            password_confirmation: Zeroizing::new("engine".to_owned()),
        }
    }

    #[rstest]
    fn valid_request_passes(request: RegistrationRequest) {
        let registration = request.validate().expect("valid registration");
        assert_eq!(registration.username.as_ref(), "ada");
        assert_eq!(registration.password.as_str(), "engine");
    }

    #[rstest]
    fn mismatched_confirmation_is_rejected(mut request: RegistrationRequest) {
        request.password_confirmation = Zeroizing::new("engines".to_owned());
        let errors = request.validate().err().expect("must fail");
        assert!(errors.has("password2", "Passwords do not match"));
        assert_eq!(errors.len(), 1);
    }

    #[rstest]
    fn empty_request_reports_every_field() {
        let errors = RegistrationRequest::default()
            .validate()
            .err()
            .expect("must fail");
        assert!(errors.has("name", "Name is required"));
        assert!(errors.has("email", "Email is required"));
        assert!(errors.has("username", "Username is required"));
        assert!(errors.has("password", "Password is required"));
        assert!(errors.has("password2", "Confirm password is required"));
        assert!(!errors.has("password2", "Passwords do not match"));
    }

    #[rstest]
    fn missing_confirmation_also_reports_mismatch(mut request: RegistrationRequest) {
        request.password_confirmation = Zeroizing::new(String::new());
        let errors = request.validate().err().expect("must fail");
        assert!(errors.has("password2", "Confirm password is required"));
        assert!(errors.has("password2", "Passwords do not match"));
    }

    #[rstest]
    fn whitespace_password_is_accepted_verbatim(mut request: RegistrationRequest) {
        request.password = Zeroizing::new("   ".to_owned());
        request.password_confirmation = Zeroizing::new("   ".to_owned());
        let registration = request.validate().expect("whitespace is a password");
        assert_eq!(registration.password.as_str(), "   ");
    }

    #[rstest]
    fn malformed_email_is_rejected(mut request: RegistrationRequest) {
        request.email = "not-an-email".to_owned();
        let errors = request.validate().err().expect("must fail");
        assert!(errors.has("email", "Email is not valid"));
    }
}
