use std::sync::Arc;

use crate::{
    auth::TokenIssuer,
    config::AppConfig,
    recent::RecentlyViewed,
    store::{ArticleStore, MemoryStore, UserStore},
};

/// Everything the handlers share, built once by the binary
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub articles: Arc<dyn ArticleStore>,
    pub tokens: Arc<TokenIssuer>,
    pub recently_viewed: Arc<RecentlyViewed>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// State backed by a fresh in-memory store
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::with_stores(config, store.clone(), store)
    }

    pub fn with_stores(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        articles: Arc<dyn ArticleStore>,
    ) -> Self {
        Self {
            users,
            articles,
            tokens: Arc::new(TokenIssuer::new(config.token_ttl)),
            recently_viewed: Arc::new(RecentlyViewed::with_capacity(
                config.recently_viewed_capacity,
            )),
            config: Arc::new(config),
        }
    }
}
