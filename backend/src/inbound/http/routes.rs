//! Page route table.
//!
//! Static article paths are registered ahead of `/articles/{id}` so that
//! `add` and `edit` are never read as article ids.

use actix_web::web;

use crate::inbound::http::{articles, users};

/// Register every page route. Callers supply `web::Data<HttpState>` and
/// the session middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(articles::index)
        .service(
            web::scope("/articles")
                .service(articles::add_form)
                .service(articles::add)
                .service(articles::edit_form)
                .service(articles::edit)
                .service(articles::remove)
                .service(articles::show),
        )
        .service(
            web::scope("/users")
                .service(users::register_form)
                .service(users::register)
                .service(users::login_form)
                .service(users::login)
                .service(users::logout),
        );
}
