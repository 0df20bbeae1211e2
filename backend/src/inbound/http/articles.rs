//! Article page handlers.
//!
//! ```text
//! GET    /                      index
//! GET    /articles/add          add form (login required)
//! POST   /articles/add          create (login required)
//! GET    /articles/edit/{id}    edit form (owner only)
//! POST   /articles/edit/{id}    revise (owner only)
//! DELETE /articles/{id}         delete (owner only, answers with a status)
//! GET    /articles/{id}         article with its author's name
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::article_service::ARTICLE_NOT_FOUND;
use crate::domain::{
    ArticleDraft, ArticleId, ArticleRevision, CommandError, Error, ErrorCode, FieldErrors,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::flash::Notice;
use crate::inbound::http::guard::Authenticated;
use crate::inbound::http::page::{PageContext, View, redirect_with};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const HOME: &str = "/";

/// Add-form fields. Missing fields deserialise as empty.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ArticleForm {
    /// Headline.
    pub title: String,
    /// Article text.
    pub body: String,
}

impl From<ArticleForm> for ArticleDraft {
    fn from(form: ArticleForm) -> Self {
        Self {
            title: form.title,
            body: form.body,
        }
    }
}

/// Edit-form fields, including the author id.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RevisionForm {
    /// Headline.
    pub title: String,
    /// Author id as submitted.
    pub author: String,
    /// Article text.
    pub body: String,
}

impl From<RevisionForm> for ArticleRevision {
    fn from(form: RevisionForm) -> Self {
        Self {
            title: form.title,
            author: form.author,
            body: form.body,
        }
    }
}

fn parse_id(raw: &str) -> Result<ArticleId, Error> {
    ArticleId::new(raw).map_err(|_| Error::not_found(ARTICLE_NOT_FOUND))
}

/// Non-owners are bounced home with a notice; everything else propagates.
fn reject(error: Error) -> ApiResult<HttpResponse> {
    if error.code() == ErrorCode::Forbidden {
        Ok(redirect_with(HOME, Notice::danger(error.message())))
    } else {
        Err(error)
    }
}

/// List every article.
#[get("/")]
pub async fn index(state: web::Data<HttpState>, page: PageContext) -> ApiResult<HttpResponse> {
    let articles = state.articles_query.list().await?;
    Ok(page.render(
        View::new("index")
            .with("title", "Articles")
            .with("articles", articles),
    ))
}

/// Render the add form.
#[get("/add")]
pub async fn add_form(auth: Authenticated) -> HttpResponse {
    auth.page
        .render(View::new("add_article").with("title", "Add Article"))
}

/// Create an article owned by the logged-in user.
#[post("/add")]
pub async fn add(
    state: web::Data<HttpState>,
    auth: Authenticated,
    form: web::Form<ArticleForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let submitted = json!({ "title": &form.title, "body": &form.body });
    match state.articles.create(auth.user.id(), form.into()).await {
        Ok(_) => Ok(redirect_with(HOME, Notice::success("Article Added"))),
        Err(CommandError::Validation(errors)) => Ok(auth.page.render(
            View::new("add_article")
                .status(StatusCode::UNPROCESSABLE_ENTITY)
                .with("title", "Add Article")
                .with("article", submitted)
                .with("errors", errors),
        )),
        Err(CommandError::Failed(error)) => Err(error),
    }
}

/// Edit form for an article the user owns.
#[get("/edit/{id}")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    match state.articles_query.get_owned(&id, auth.user.id()).await {
        Ok(article) => Ok(auth.page.render(
            View::new("edit_article")
                .with("title", "Edit Article")
                .with("article", article),
        )),
        Err(error) => reject(error),
    }
}

/// Replace title, author and body of an owned article.
#[post("/edit/{id}")]
pub async fn edit(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    form: web::Form<RevisionForm>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    match state
        .articles
        .update(&id, auth.user.id(), form.into_inner().into())
        .await
    {
        Ok(_) => Ok(redirect_with(HOME, Notice::success("Article Updated"))),
        Err(CommandError::Validation(errors)) => {
            render_edit_errors(&state, &auth, &id, errors).await
        }
        Err(CommandError::Failed(error)) => reject(error),
    }
}

async fn render_edit_errors(
    state: &HttpState,
    auth: &Authenticated,
    id: &ArticleId,
    errors: FieldErrors,
) -> ApiResult<HttpResponse> {
    match state.articles_query.get_owned(id, auth.user.id()).await {
        Ok(article) => Ok(auth.page.render(
            View::new("edit_article")
                .status(StatusCode::UNPROCESSABLE_ENTITY)
                .with("title", "Edit Article")
                .with("article", article)
                .with("errors", errors),
        )),
        Err(error) => reject(error),
    }
}

/// Delete an owned article. Called from scripts, so failures are plain
/// status codes rather than redirects.
#[delete("/{id}")]
pub async fn remove(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let Some(requester) = session.user_id()? else {
        return Err(Error::unauthorized("Please login"));
    };
    let id = parse_id(&path)?;
    state.articles.delete(&id, Some(requester)).await?;
    Ok(HttpResponse::Ok().body("Success"))
}

/// One article with its author's display name.
#[get("/{id}")]
pub async fn show(
    state: web::Data<HttpState>,
    page: PageContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let found = state.articles_query.get_with_author(&id).await?;
    Ok(page.render(
        View::new("article")
            .with("article", found.article)
            .with("author", found.author_name),
    ))
}

#[cfg(test)]
#[path = "articles_tests.rs"]
mod tests;
