pub mod error;
pub mod memory;

use async_trait::async_trait;
use derive_more::Constructor;

use crate::model::{Article, ArticleId, User, UserId};

pub use error::StoreError;
pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Constructor)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Constructor)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub author_id: UserId,
    pub author: String,
}

/// Fields left as `None` keep their current value
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// One page of a listing, `page` is 1-based
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl<T> Page<T> {
    pub fn pages(&self) -> usize {
        self.total.div_ceil(self.per_page.max(1))
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<User>;

    async fn user_by_name(&self, username: &str) -> Result<Option<User>>;

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>>;
}

#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn insert_article(&self, article: NewArticle) -> Result<Article>;

    async fn article(&self, id: ArticleId) -> Result<Option<Article>>;

    /// Newest first. Pages past the end are empty.
    async fn articles_page(&self, page: usize, per_page: usize) -> Result<Page<Article>>;

    async fn update_article(&self, id: ArticleId, changes: ArticleChanges)
        -> Result<Option<Article>>;

    /// Returns false if no such article existed
    async fn delete_article(&self, id: ArticleId) -> Result<bool>;

    /// Ids that do not resolve are skipped; result order is unspecified.
    async fn articles_by_ids(&self, ids: &[ArticleId]) -> Result<Vec<Article>>;
}
