use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct ArticleId(pub u64);

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// argon2 hash in PHC string format
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub author_id: UserId,
    /// Username of the author at creation time
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl Article {
    pub fn is_written_by(&self, user: UserId) -> bool {
        self.author_id == user
    }
}
