use super::handlers;
use super::state::AppState;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/media",
            get(handlers::media::list_media).post(handlers::media::create_media),
        )
        .route(
            "/api/media/delete-many",
            post(handlers::media::delete_many_media),
        )
        .route("/api/media/:id", delete(handlers::media::delete_media))
}

pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(handlers::media::health))
}
