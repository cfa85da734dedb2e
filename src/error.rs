use std::error::Error;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::{auth::AuthError, store::StoreError};

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Request body is missing or not JSON")]
    MalformedBody(#[from] JsonRejection),

    #[error("Missing or invalid '{0}' field")]
    InvalidField(&'static str),

    #[error("Username and password are required")]
    MissingCredentials,

    #[error("Bad username or password")]
    BadCredentials,

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("User not found")]
    UserNotFound,

    #[error("Article not found")]
    ArticleNotFound,

    #[error("Article not found")]
    MalformedArticleId(#[from] PathRejection),

    #[error("Forbidden: You are not the author")]
    NotAuthor,

    #[error("Username already exists")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, RestError>;

impl RestError {
    fn status(&self) -> StatusCode {
        match self {
            RestError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            RestError::InvalidField(_) => StatusCode::BAD_REQUEST,
            RestError::MissingCredentials => StatusCode::BAD_REQUEST,
            RestError::BadCredentials => StatusCode::UNAUTHORIZED,
            RestError::Auth(AuthError::Hash(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::Auth(_) => StatusCode::UNAUTHORIZED,
            RestError::UserNotFound => StatusCode::NOT_FOUND,
            RestError::ArticleNotFound => StatusCode::NOT_FOUND,
            RestError::MalformedArticleId(_) => StatusCode::NOT_FOUND,
            RestError::NotAuthor => StatusCode::FORBIDDEN,
            RestError::Store(StoreError::DuplicateUsername(_)) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("{}: {:?}", self, self.source());
        } else {
            warn!("{}: {:?}", self, self.source());
        }

        let message = match &self {
            // hashing details stay in the server log
            RestError::Auth(AuthError::Hash(_)) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(json!({ "msg": message }))).into_response()
    }
}
