use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{auth::AuthError, error::RestError, http::state::AppState, model::User};

/// The user behind the request's `Authorization: Bearer` token
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = RestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?;

        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(AuthError::InvalidToken)?;

        let user_id = state.tokens.resolve(token)?;

        let user = state
            .users
            .user_by_id(user_id)
            .await?
            .ok_or(RestError::UserNotFound)?;

        Ok(AuthUser(user))
    }
}
