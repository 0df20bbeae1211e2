//! Login guard for page routes.
//!
//! Handlers that take [`Authenticated`] only run for logged-in users.
//! Anonymous requests are sent to the login form with a notice instead.

use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::User;
use crate::inbound::http::flash::Notice;
use crate::inbound::http::page::{PageContext, redirect_with};

/// Where anonymous visitors of guarded pages are sent.
pub const LOGIN_PATH: &str = "/users/login";

/// Rejection raised when a guarded page is requested anonymously.
#[derive(Debug, thiserror::Error)]
#[error("login required")]
pub struct LoginRequired;

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        redirect_with(LOGIN_PATH, Notice::danger("Please login"))
    }
}

/// Page context for a request with a logged-in user.
pub struct Authenticated {
    /// The logged-in user.
    pub user: User,
    /// The rest of the page state.
    pub page: PageContext,
}

impl FromRequest for Authenticated {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let page = PageContext::from_request(req, payload);
        Box::pin(async move {
            let page = page.await?;
            match page.user().cloned() {
                Some(user) => Ok(Self { user, page }),
                None => Err(LoginRequired.into()),
            }
        })
    }
}
