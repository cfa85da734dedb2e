use std::collections::HashMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{
    error::{RestError, Result},
    http::{extract::AuthUser, state::AppState},
    model::{Article, ArticleId},
    store::{ArticleChanges, NewArticle},
};

const DEFAULT_PAGE: usize = 1;
const DEFAULT_PER_PAGE: usize = 10;

#[derive(Debug, Serialize)]
pub struct ArticleSummary {
    pub id: ArticleId,
    pub title: String,
    pub author: String,
    pub date_created: DateTime<Utc>,
}

impl From<Article> for ArticleSummary {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            author: article.author,
            date_created: article.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub author: String,
    pub date_created: DateTime<Utc>,
}

impl From<Article> for ArticleDetail {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            content: article.content,
            author: article.author,
            date_created: article.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleListing {
    pub articles: Vec<ArticleSummary>,
    pub total: usize,
    pub pages: usize,
    pub current_page: usize,
}

/// Fields are loosely typed so a wrong type is reported per field
#[derive(Debug, Deserialize)]
pub struct ArticleInput {
    title: Option<Value>,
    content: Option<Value>,
}

fn required_text(value: Option<Value>, field: &'static str) -> Result<String> {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Ok(text),
        _ => Err(RestError::InvalidField(field)),
    }
}

fn optional_text(value: Option<Value>, field: &'static str) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(_) => Err(RestError::InvalidField(field)),
    }
}

/// Ids that are not a u64 can never name an article
type ArticlePath = std::result::Result<Path<ArticleId>, PathRejection>;

/// Unparseable values fall back to the default instead of failing the request
fn query_number(params: &HashMap<String, String>, key: &str, default: usize) -> usize {
    params
        .get(key)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ArticleListing>> {
    let page = query_number(&params, "page", DEFAULT_PAGE).max(1);
    let per_page = query_number(&params, "per_page", DEFAULT_PER_PAGE)
        .clamp(1, state.config.max_per_page.get());

    let listing = state.articles.articles_page(page, per_page).await?;
    debug!(
        "Listing page {} ({} of {} articles)",
        listing.page,
        listing.items.len(),
        listing.total
    );

    Ok(Json(ArticleListing {
        total: listing.total,
        pages: listing.pages(),
        current_page: listing.page,
        articles: listing.items.into_iter().map(ArticleSummary::from).collect(),
    }))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: std::result::Result<Json<ArticleInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(input) = body?;
    let title = required_text(input.title, "title")?;
    let content = required_text(input.content, "content")?;

    let article = state
        .articles
        .insert_article(NewArticle::new(title, content, user.id, user.username))
        .await?;

    info!("Article {} created by {}", article.id, article.author);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "Article created", "id": article.id })),
    ))
}

pub async fn show(
    path: ArticlePath,
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ArticleDetail>> {
    let Path(article_id) = path?;
    let article = state
        .articles
        .article(article_id)
        .await?
        .ok_or(RestError::ArticleNotFound)?;

    state.recently_viewed.record_view(user.id, article.id);

    Ok(Json(ArticleDetail::from(article)))
}

/// Load `article_id` and make sure `user` wrote it
async fn owned_article(state: &AppState, article_id: ArticleId, user: &AuthUser) -> Result<Article> {
    let article = state
        .articles
        .article(article_id)
        .await?
        .ok_or(RestError::ArticleNotFound)?;

    if !article.is_written_by(user.0.id) {
        return Err(RestError::NotAuthor);
    }

    Ok(article)
}

pub async fn update(
    path: ArticlePath,
    State(state): State<AppState>,
    user: AuthUser,
    body: std::result::Result<Json<ArticleInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Path(article_id) = path?;
    let article = owned_article(&state, article_id, &user).await?;

    let Json(input) = body?;
    let changes = ArticleChanges {
        title: optional_text(input.title, "title")?,
        content: optional_text(input.content, "content")?,
    };

    state
        .articles
        .update_article(article.id, changes)
        .await?
        .ok_or(RestError::ArticleNotFound)?;

    info!("Article {} updated", article.id);

    Ok(Json(json!({ "msg": "Article updated" })))
}

pub async fn delete(
    path: ArticlePath,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse> {
    let Path(article_id) = path?;
    let article = owned_article(&state, article_id, &user).await?;

    if !state.articles.delete_article(article.id).await? {
        return Err(RestError::ArticleNotFound);
    }

    info!("Article {} deleted", article.id);

    Ok(Json(json!({ "msg": "Article deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert_eq!(
            required_text(Some(json!("hello")), "title").unwrap(),
            "hello"
        );
        assert!(matches!(
            required_text(Some(json!(42)), "title"),
            Err(RestError::InvalidField("title"))
        ));
        assert!(matches!(
            required_text(Some(json!("")), "content"),
            Err(RestError::InvalidField("content"))
        ));
        assert!(required_text(None, "title").is_err());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(None, "title").unwrap(), None);
        assert_eq!(optional_text(Some(Value::Null), "title").unwrap(), None);
        assert_eq!(
            optional_text(Some(json!("x")), "title").unwrap(),
            Some("x".to_string())
        );
        assert!(optional_text(Some(json!(["x"])), "title").is_err());
    }

    #[test]
    fn test_query_number_falls_back() {
        let params: HashMap<String, String> = [
            ("page".to_string(), "3".to_string()),
            ("per_page".to_string(), "many".to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(query_number(&params, "page", DEFAULT_PAGE), 3);
        assert_eq!(query_number(&params, "per_page", DEFAULT_PER_PAGE), 10);
        assert_eq!(query_number(&params, "missing", 7), 7);
    }
}
