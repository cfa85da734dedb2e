// HTTP server module

pub mod articles;
pub mod auth;
pub mod extract;
pub mod state;
pub mod users;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use extract::AuthUser;
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/articles", get(articles::list).post(articles::create))
        .route(
            "/articles/{article_id}",
            get(articles::show)
                .put(articles::update)
                .delete(articles::delete),
        )
        .route("/users/me/recently-viewed", get(users::recently_viewed));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "tracked_users": state.recently_viewed.tracked_users(),
    }))
}
