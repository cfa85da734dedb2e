use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::model::{Article, ArticleId, User, UserId};
use crate::store::{
    ArticleChanges, ArticleStore, NewArticle, NewUser, Page, Result, StoreError, UserStore,
};

#[derive(Debug, Default)]
struct UserTable {
    by_id: HashMap<UserId, User>,
    by_name: HashMap<String, UserId>,
}

/// Process-local store backing both users and articles
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<UserTable>,
    articles: RwLock<BTreeMap<ArticleId, Article>>,
    last_user_id: AtomicU64,
    last_article_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let mut table = self.users.write().await;

        if table.by_name.contains_key(&user.username) {
            return Err(StoreError::DuplicateUsername(user.username));
        }

        let id = UserId(self.last_user_id.fetch_add(1, Ordering::Relaxed) + 1);
        let user = User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };

        table.by_name.insert(user.username.clone(), id);
        table.by_id.insert(id, user.clone());

        debug!("stored user {} as {}", user.username, id);
        Ok(user)
    }

    async fn user_by_name(&self, username: &str) -> Result<Option<User>> {
        let table = self.users.read().await;
        Ok(table
            .by_name
            .get(username)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.read().await.by_id.get(&id).cloned())
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn insert_article(&self, article: NewArticle) -> Result<Article> {
        let id = ArticleId(self.last_article_id.fetch_add(1, Ordering::Relaxed) + 1);
        let article = Article {
            id,
            title: article.title,
            content: article.content,
            author_id: article.author_id,
            author: article.author,
            created_at: Utc::now(),
        };

        self.articles.write().await.insert(id, article.clone());

        debug!("stored article {} by {}", id, article.author_id);
        Ok(article)
    }

    async fn article(&self, id: ArticleId) -> Result<Option<Article>> {
        Ok(self.articles.read().await.get(&id).cloned())
    }

    async fn articles_page(&self, page: usize, per_page: usize) -> Result<Page<Article>> {
        let page = page.max(1);
        let per_page = per_page.max(1);

        let articles = self.articles.read().await;
        let mut newest_first: Vec<&Article> = articles.values().collect();
        newest_first.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let items = newest_first
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .cloned()
            .collect();

        Ok(Page {
            items,
            total: articles.len(),
            page,
            per_page,
        })
    }

    async fn update_article(
        &self,
        id: ArticleId,
        changes: ArticleChanges,
    ) -> Result<Option<Article>> {
        let mut articles = self.articles.write().await;

        let Some(article) = articles.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            article.title = title;
        }
        if let Some(content) = changes.content {
            article.content = content;
        }

        Ok(Some(article.clone()))
    }

    async fn delete_article(&self, id: ArticleId) -> Result<bool> {
        Ok(self.articles.write().await.remove(&id).is_some())
    }

    async fn articles_by_ids(&self, ids: &[ArticleId]) -> Result<Vec<Article>> {
        let articles = self.articles.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| articles.get(id))
            .cloned()
            .collect())
    }
}
