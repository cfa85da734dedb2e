use std::collections::VecDeque;
use std::num::NonZeroUsize;

use dashmap::DashMap;
use tracing::trace;

use crate::model::{ArticleId, UserId};

/// Number of articles remembered per user unless configured otherwise
pub const CAPACITY: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Per-user list of recently viewed articles, most recent first.
///
/// Histories live only in memory and are sharded by user, so views from
/// unrelated users rarely touch the same lock. A single user's history is
/// always read and written under its shard lock, which makes `record_view`
/// atomic with respect to `list_viewed` for that user.
#[derive(Debug)]
pub struct RecentlyViewed {
    histories: DashMap<UserId, VecDeque<ArticleId>>,
    capacity: usize,
}

impl Default for RecentlyViewed {
    fn default() -> Self {
        Self::new()
    }
}

impl RecentlyViewed {
    pub fn new() -> Self {
        Self::with_capacity(CAPACITY)
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            histories: DashMap::new(),
            capacity: capacity.get(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Move `article` to the front of `user`'s history, evicting the oldest
    /// entry once the history is full.
    pub fn record_view(&self, user: UserId, article: ArticleId) {
        // get-or-create and the update below share the same shard guard
        let mut history = self
            .histories
            .entry(user)
            .or_insert_with(|| VecDeque::with_capacity(self.capacity + 1));

        if let Some(position) = history.iter().position(|id| *id == article) {
            history.remove(position);
        }

        history.push_front(article);
        history.truncate(self.capacity);

        trace!("user {} history now {:?}", user, *history);
    }

    /// Snapshot of `user`'s history. Unknown users get an empty list.
    pub fn list_viewed(&self, user: UserId) -> Vec<ArticleId> {
        self.histories
            .get(&user)
            .map(|history| history.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of users with a history
    pub fn tracked_users(&self) -> usize {
        self.histories.len()
    }
}
