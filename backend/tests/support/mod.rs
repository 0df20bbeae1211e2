//! Shared harness for page-level integration tests.
//!
//! [`Browser`] drives the real router over in-memory stores and keeps the
//! session cookie between requests the way a browser would.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use mockable::DefaultClock;
use serde_json::Value;

use pressroom::Trace;
use pressroom::domain::{ArticleService, AuthService};
use pressroom::inbound::http::flash::{FLASH_COOKIE, Notice};
use pressroom::inbound::http::routes;
use pressroom::inbound::http::session_config::{SESSION_COOKIE, SessionSettings};
use pressroom::inbound::http::state::HttpState;
use pressroom::outbound::memory::{InMemoryArticleRepository, InMemoryUserRepository};
use pressroom::outbound::password::Argon2PasswordHasher;

pub const PASSWORD: &str = "hunter22";

/// Fresh services over empty in-memory stores.
pub fn memory_state() -> HttpState {
    let users = Arc::new(InMemoryUserRepository::new());
    let articles = Arc::new(InMemoryArticleRepository::new());
    let accounts = Arc::new(AuthService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher::new()),
    ));
    let service = Arc::new(ArticleService::new(articles, users, Arc::new(DefaultClock)));
    HttpState::new(accounts, service.clone(), service)
}

/// Initialise the page router behind tracing and a throwaway session key.
pub async fn start(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    let session = SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
    };
    test::init_service(
        App::new()
            .wrap(Trace)
            .app_data(web::Data::new(state))
            .service(
                web::scope("")
                    .wrap(session.middleware())
                    .configure(routes::configure),
            ),
    )
    .await
}

/// Response summary: status, redirect target, flashed notice and JSON body.
#[derive(Debug)]
pub struct Page {
    pub status: u16,
    pub location: Option<String>,
    pub notice: Option<Notice>,
    pub body: Value,
}

/// One user agent with its own session cookie.
#[derive(Default)]
pub struct Browser {
    session: Option<Cookie<'static>>,
}

impl Browser {
    pub async fn send<S, B>(&mut self, app: &S, req: TestRequest) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = match &self.session {
            Some(cookie) => req.cookie(cookie.clone()),
            None => req,
        };
        let res = test::call_service(app, req.to_request()).await;

        let mut notice = None;
        for cookie in res.response().cookies() {
            if cookie.name() == SESSION_COOKIE {
                self.session = (!cookie.value().is_empty()).then(|| cookie.into_owned());
            } else if cookie.name() == FLASH_COOKIE && !cookie.value().is_empty() {
                let carrier = TestRequest::default()
                    .cookie(cookie.into_owned())
                    .to_http_request();
                notice = Notice::from_request(&carrier);
            }
        }
        let status = res.status().as_u16();
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = test::read_body(res).await;
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        Page {
            status,
            location,
            notice,
            body,
        }
    }

    pub async fn get<S, B>(&mut self, app: &S, uri: &str) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.send(app, TestRequest::get().uri(uri)).await
    }

    pub async fn post<S, B>(&mut self, app: &S, uri: &str, form: &[(&str, &str)]) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.send(app, TestRequest::post().uri(uri).set_form(form))
            .await
    }

    pub async fn delete<S, B>(&mut self, app: &S, uri: &str) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.send(app, TestRequest::delete().uri(uri)).await
    }

    /// Register `name` with username `name` lower-cased.
    pub async fn register<S, B>(&mut self, app: &S, name: &str) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let username = name.to_lowercase();
        let email = format!("{username}@example.com");
        self.post(
            app,
            "/users/register",
            &[
                ("name", name),
                ("email", email.as_str()),
                ("username", username.as_str()),
                ("password", PASSWORD),
                ("password2", PASSWORD),
            ],
        )
        .await
    }

    pub async fn login<S, B>(&mut self, app: &S, username: &str, password: &str) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.post(
            app,
            "/users/login",
            &[("username", username), ("password", password)],
        )
        .await
    }

    /// Create an article and return its id as listed on the index page.
    pub async fn add_article<S, B>(&mut self, app: &S, title: &str, body: &str) -> String
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let added = self
            .post(app, "/articles/add", &[("title", title), ("body", body)])
            .await;
        assert_eq!(added.status, 303, "article creation should redirect");
        let index = self.get(app, "/").await;
        index.body["articles"]
            .as_array()
            .and_then(|articles| {
                articles
                    .iter()
                    .find(|article| article["title"] == title)
                    .and_then(|article| article["id"].as_str())
            })
            .map(str::to_owned)
            .expect("created article is listed")
    }
}
