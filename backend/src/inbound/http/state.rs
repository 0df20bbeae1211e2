//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! ports, so tests can wire in-memory adapters or mocks.

use std::sync::Arc;

use crate::domain::ports::{AccountService, ArticleCommand, ArticleQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login and identity restore.
    pub accounts: Arc<dyn AccountService>,
    /// Article mutations.
    pub articles: Arc<dyn ArticleCommand>,
    /// Article reads.
    pub articles_query: Arc<dyn ArticleQuery>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(
        accounts: Arc<dyn AccountService>,
        articles: Arc<dyn ArticleCommand>,
        articles_query: Arc<dyn ArticleQuery>,
    ) -> Self {
        Self {
            accounts,
            articles,
            articles_query,
        }
    }
}
