//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test, web};
use mockable::DefaultClock;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{ArticleService, AuthService, PasswordHash, RegistrationRequest, UserId};
use crate::inbound::http::flash::{FLASH_COOKIE, Notice};
use crate::inbound::http::routes;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryArticleRepository, InMemoryUserRepository};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The cookie called `name` set by `res`, if any.
pub fn cookie_named<B>(res: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == name)
        .map(Cookie::into_owned)
}

/// Reversible hasher so handler tests skip the Argon2 cost.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        PasswordHash::new(format!("plain${password}"))
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        hash.as_str()
            .strip_prefix("plain$")
            .map(|stored| stored == password)
            .ok_or_else(|| PasswordHashError::malformed("missing plain$ prefix"))
    }
}

/// Handler state over fresh in-memory stores.
pub fn memory_state() -> HttpState {
    let users = Arc::new(InMemoryUserRepository::new());
    let articles = Arc::new(InMemoryArticleRepository::new());
    let accounts = Arc::new(AuthService::new(users.clone(), Arc::new(PlainHasher)));
    let article_service = Arc::new(ArticleService::new(
        articles,
        users,
        Arc::new(DefaultClock),
    ));
    HttpState::new(accounts, article_service.clone(), article_service)
}

/// Page routes over `state` behind the test session middleware.
pub fn page_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(test_session_middleware())
        .app_data(web::Data::new(state))
        .configure(routes::configure)
}

/// Password of the seeded user.
pub const PASSWORD: &str = "correct horse";

/// Register `name` directly through the account service. The username is
/// `name` in lower case and the password is [`PASSWORD`].
pub async fn seed_user(state: &HttpState, name: &str) -> UserId {
    let request = RegistrationRequest {
        name: name.to_owned(),
        email: format!("{}@example.com", name.to_lowercase()),
        username: name.to_lowercase(),
        password: Zeroizing::new(PASSWORD.to_owned()),
        password_confirmation: Zeroizing::new(PASSWORD.to_owned()),
    };
    match state.accounts.register(request).await {
        Ok(id) => id,
        Err(err) => panic!("seeding {name} failed: {err:?}"),
    }
}

/// Log `username` in through the login form and return the session cookie.
pub async fn login_cookie<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/users/login")
        .set_form([("username", username), ("password", PASSWORD)])
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(
        location(&res),
        Some("/"),
        "login for {username} should redirect home"
    );
    cookie_named(&res, "session").expect("session cookie after login")
}

/// `Location` header of a redirect.
pub fn location<B>(res: &ServiceResponse<B>) -> Option<&str> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

/// Notice carried by the `flash` cookie of a redirect.
pub fn flash_notice<B>(res: &ServiceResponse<B>) -> Option<Notice> {
    let cookie = cookie_named(res, FLASH_COOKIE)?;
    let req = test::TestRequest::default().cookie(cookie).to_http_request();
    Notice::from_request(&req)
}
