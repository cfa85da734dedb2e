use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::{
    auth::{hash_password, verify_password, AuthError},
    error::{RestError, Result},
    http::state::AppState,
    store::{NewUser, StoreError},
};

/// Loosely typed so a non-string field reads as a missing credential
#[derive(Debug, Deserialize)]
pub struct Credentials {
    username: Option<Value>,
    password: Option<Value>,
}

impl Credentials {
    fn into_parts(self) -> Option<(String, String)> {
        match (self.username, self.password) {
            (Some(Value::String(username)), Some(Value::String(password)))
                if !username.is_empty() && !password.is_empty() =>
            {
                Some((username, password))
            }
            _ => None,
        }
    }
}

/// argon2 is CPU bound, keep it off the async workers
async fn off_runtime<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AuthError::Hash(e.to_string()).into())
}

pub async fn register(
    State(state): State<AppState>,
    body: std::result::Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(credentials) = body?;
    let (username, password) = credentials
        .into_parts()
        .ok_or(RestError::MissingCredentials)?;

    if state.users.user_by_name(&username).await?.is_some() {
        return Err(StoreError::DuplicateUsername(username).into());
    }

    let password_hash = off_runtime(move || hash_password(&password)).await??;
    let user = state
        .users
        .insert_user(NewUser::new(username, password_hash))
        .await?;

    info!("Registered user {} as {}", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "User created successfully" })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(credentials) = body?;
    let (username, password) = credentials
        .into_parts()
        .ok_or(RestError::BadCredentials)?;

    let user = state
        .users
        .user_by_name(&username)
        .await?
        .ok_or(RestError::BadCredentials)?;

    let stored = user.password_hash.clone();
    if !off_runtime(move || verify_password(&password, &stored)).await? {
        return Err(RestError::BadCredentials);
    }

    let access_token = state.tokens.issue(user.id);
    info!("User {} logged in", user.username);

    Ok(Json(json!({ "access_token": access_token })))
}
