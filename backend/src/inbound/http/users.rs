//! Account page handlers.
//!
//! ```text
//! GET  /users/register  registration form
//! POST /users/register  create an account
//! GET  /users/login     login form
//! POST /users/login     bind the session to a user
//! GET  /users/logout    drop the session
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::{AuthError, CommandError, LoginCredentials, RegistrationRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::flash::Notice;
use crate::inbound::http::guard::LOGIN_PATH;
use crate::inbound::http::page::{PageContext, View, redirect, redirect_with};
use crate::inbound::http::state::HttpState;

/// Registration form fields; `password2` is the confirmation.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    /// Display name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Login handle.
    pub username: String,
    /// Chosen password.
    pub password: Zeroizing<String>,
    /// Confirmation; must equal `password`.
    pub password2: Zeroizing<String>,
}

impl From<RegisterForm> for RegistrationRequest {
    fn from(form: RegisterForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            username: form.username,
            password: form.password,
            password_confirmation: form.password2,
        }
    }
}

/// Login form fields.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    /// Login handle.
    pub username: String,
    /// Password as typed.
    pub password: Zeroizing<String>,
}

/// Render the registration form.
#[get("/register")]
pub async fn register_form(page: PageContext) -> HttpResponse {
    page.render(View::new("register"))
}

/// Create an account. The new user still has to log in.
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    page: PageContext,
    form: web::Form<RegisterForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let submitted = json!({
        "name": &form.name,
        "email": &form.email,
        "username": &form.username,
    });
    match state.accounts.register(form.into()).await {
        Ok(user_id) => {
            info!(user_id = %user_id, "registered user");
            Ok(redirect_with(
                LOGIN_PATH,
                Notice::success("You are now registered and can log in"),
            ))
        }
        Err(CommandError::Validation(errors)) => Ok(page.render(
            View::new("register")
                .status(StatusCode::UNPROCESSABLE_ENTITY)
                .with("form", submitted)
                .with("errors", errors),
        )),
        Err(CommandError::Failed(error)) => Err(error),
    }
}

/// Render the login form.
#[get("/login")]
pub async fn login_form(page: PageContext) -> HttpResponse {
    page.render(View::new("login"))
}

/// Check credentials and bind the session. Rejected credentials go back to
/// the login form with a notice; store failures are server errors.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    page: PageContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let Ok(credentials) = LoginCredentials::try_from_parts(&form.username, &form.password) else {
        return Ok(redirect_with(
            LOGIN_PATH,
            Notice::danger("Missing credentials"),
        ));
    };
    match state.accounts.verify_credentials(&credentials).await {
        Ok(user_id) => {
            page.session().persist_user(&user_id)?;
            info!(user_id = %user_id, "user logged in");
            Ok(redirect("/"))
        }
        Err(AuthError::Unavailable(error)) => Err(error),
        Err(err) => Ok(redirect_with(LOGIN_PATH, Notice::danger(err.note()))),
    }
}

/// Drop the session and return to the login form.
#[get("/logout")]
pub async fn logout(page: PageContext) -> HttpResponse {
    page.session().purge();
    redirect_with(LOGIN_PATH, Notice::success("You are logged out"))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
