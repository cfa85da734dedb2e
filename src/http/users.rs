use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::debug;

use crate::{
    error::Result,
    http::{extract::AuthUser, state::AppState},
    model::{Article, ArticleId},
};

#[derive(Debug, Serialize)]
pub struct ViewedArticle {
    pub id: ArticleId,
    pub title: String,
}

impl From<&Article> for ViewedArticle {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
        }
    }
}

/// The caller's recently viewed articles, most recent first. Articles deleted
/// since they were viewed are left out.
pub async fn recently_viewed(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<ViewedArticle>>> {
    let ids = state.recently_viewed.list_viewed(user.id);

    let found: HashMap<ArticleId, Article> = state
        .articles
        .articles_by_ids(&ids)
        .await?
        .into_iter()
        .map(|article| (article.id, article))
        .collect();

    let viewed: Vec<ViewedArticle> = ids
        .iter()
        .filter_map(|id| found.get(id))
        .map(ViewedArticle::from)
        .collect();

    if viewed.len() < ids.len() {
        debug!(
            "Skipped {} deleted articles in history of {}",
            ids.len() - viewed.len(),
            user.username
        );
    }

    Ok(Json(viewed))
}
