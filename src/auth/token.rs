use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::model::UserId;

#[derive(Debug, Clone, Copy)]
struct IssuedToken {
    user: UserId,
    issued_at: DateTime<Utc>,
}

/// Opaque bearer tokens held in memory until they expire
#[derive(Debug)]
pub struct TokenIssuer {
    tokens: DashMap<Uuid, IssuedToken>,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(ttl: StdDuration) -> Self {
        Self {
            tokens: DashMap::new(),
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
        }
    }

    pub fn issue(&self, user: UserId) -> String {
        let token = Uuid::new_v4();
        self.tokens.insert(
            token,
            IssuedToken {
                user,
                issued_at: Utc::now(),
            },
        );

        token.simple().to_string()
    }

    pub fn resolve(&self, token: &str) -> Result<UserId, AuthError> {
        self.resolve_at(token, Utc::now())
    }

    fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, AuthError> {
        let key = Uuid::parse_str(token).map_err(|_| AuthError::InvalidToken)?;
        let issued = *self.tokens.get(&key).ok_or(AuthError::InvalidToken)?;

        if now - issued.issued_at >= self.ttl {
            self.tokens.remove(&key);
            return Err(AuthError::ExpiredToken);
        }

        Ok(issued.user)
    }

    /// Drop every expired token, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.tokens.len();
        self.tokens
            .retain(|_, issued| now - issued.issued_at < self.ttl);
        let purged = before.saturating_sub(self.tokens.len());

        if purged > 0 {
            debug!("purged {} expired tokens", purged);
        }
        purged
    }

    /// Purge expired tokens every `every` until the runtime shuts down
    pub fn spawn_purge(self: Arc<Self>, every: StdDuration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                self.purge_expired();
            }
        })
    }
}
