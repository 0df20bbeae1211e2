//! Page responses.
//!
//! Templates are rendered outside this service, so a page is the template
//! name plus its context serialised as JSON. Every page carries the
//! current user and the pending one-shot notice, and rendering a notice
//! clears its cookie.

use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::{Error, User};
use crate::inbound::http::flash::Notice;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request-scoped view state: who is asking and what notice is pending.
pub struct PageContext {
    session: SessionContext,
    user: Option<User>,
    notice: Option<Notice>,
}

impl PageContext {
    /// Session of the current request.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// The logged-in user, if the session resolves to one.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Notice carried over from the previous redirect.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Render `view` with the shared page fields.
    pub fn render(&self, view: View) -> HttpResponse {
        let View {
            template,
            status,
            mut context,
        } = view;
        context.insert("template".to_owned(), Value::from(template));
        context.insert(
            "user".to_owned(),
            to_value(self.user.as_ref().map(User::profile)),
        );
        context.insert("notice".to_owned(), to_value(self.notice.as_ref()));

        let mut response = HttpResponse::build(status);
        if self.notice.is_some() {
            response.cookie(Notice::removal_cookie());
        }
        response.json(Value::Object(context))
    }

    async fn load(req: HttpRequest, session: SessionContext) -> Result<Self, Error> {
        let notice = Notice::from_request(&req);
        let user = match session.user_id()? {
            Some(id) => {
                let state = req
                    .app_data::<web::Data<HttpState>>()
                    .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
                let user = state.accounts.current_user(&id).await?;
                if user.is_none() {
                    debug!(user_id = %id, "session refers to a missing user");
                }
                user
            }
            None => None,
        };
        Ok(Self {
            session,
            user,
            notice,
        })
    }
}

impl FromRequest for PageContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        let session = SessionContext::from_request(&req, payload);
        Box::pin(async move {
            let session = session.await?;
            Self::load(req, session).await.map_err(actix_web::Error::from)
        })
    }
}

/// Template name, status and template-specific context.
#[derive(Debug)]
pub struct View {
    template: &'static str,
    status: StatusCode,
    context: Map<String, Value>,
}

impl View {
    /// Empty context for `template`, answered with 200.
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            status: StatusCode::OK,
            context: Map::new(),
        }
    }

    /// Add a context entry.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        self.context.insert(key.to_owned(), to_value(value));
        self
    }

    /// Answer with `status` instead of 200.
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

fn to_value(value: impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        warn!(error = %err, "dropping unserialisable view value");
        Value::Null
    })
}

/// 303 to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_owned()))
        .finish()
}

/// 303 to `location` carrying `notice` to the next page.
pub fn redirect_with(location: &str, notice: Notice) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_owned()))
        .cookie(notice.to_cookie())
        .finish()
}
