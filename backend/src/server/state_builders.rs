//! Builders wiring repositories and services into [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::{info, warn};

use pressroom::domain::ports::{ArticleRepository, UserRepository};
use pressroom::domain::{ArticleService, AuthService};
use pressroom::inbound::http::state::HttpState;
use pressroom::outbound::memory::{InMemoryArticleRepository, InMemoryUserRepository};
use pressroom::outbound::password::Argon2PasswordHasher;
use pressroom::outbound::persistence::{DbPool, DieselArticleRepository, DieselUserRepository};

use super::ServerConfig;

/// Services over the given stores. One instance serves every worker.
fn services_over<U, A>(users: Arc<U>, articles: Arc<A>) -> HttpState
where
    U: UserRepository + 'static,
    A: ArticleRepository + 'static,
{
    let accounts = Arc::new(AuthService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher::new()),
    ));
    let article_service = Arc::new(ArticleService::new(
        articles,
        users,
        Arc::new(DefaultClock),
    ));
    HttpState::new(accounts, article_service.clone(), article_service)
}

fn diesel_state(pool: &DbPool) -> HttpState {
    info!("using PostgreSQL repositories");
    services_over(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselArticleRepository::new(pool.clone())),
    )
}

fn memory_state() -> HttpState {
    warn!("no database configured; data lives in memory and is lost on restart");
    services_over(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryArticleRepository::new()),
    )
}

/// Pick PostgreSQL adapters when a pool is configured, otherwise in-memory.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => diesel_state(pool),
        None => memory_state(),
    };
    web::Data::new(state)
}
