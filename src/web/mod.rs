mod error;
mod extractors;
mod handlers;
mod routes;
pub mod security;
mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use crate::{Config, Database};
use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the application router around an explicitly provided state.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.api.max_body_bytes;
    let cors_permissive = state.config.api.cors_permissive;

    let app = Router::new()
        .merge(routes::api_routes())
        .merge(routes::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(security::apply_security_headers))
        .layer(TraceLayer::new_for_http());

    let app = if cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    app.with_state(Arc::new(state))
}

pub async fn serve(config: Config, db: Database, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    serve_on(listener, config, db).await
}

/// Serves on an already bound listener, e.g. one bound to port 0.
pub async fn serve_on(listener: TcpListener, config: Config, db: Database) -> Result<()> {
    let app = router(AppState::new(config, db));
    axum::serve(listener, app).await?;
    Ok(())
}
