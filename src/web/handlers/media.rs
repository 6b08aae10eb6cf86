use crate::models::{CreateMediaRequest, DeleteManyRequest, MediaItem, SuccessResponse};
use crate::services::media;
use crate::web::error::ApiResult;
use crate::web::extractors::{ApiJson, ApiPath};
use crate::web::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use std::sync::Arc;

/// GET /api/media
pub async fn list_media(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<MediaItem>>> {
    let items = media::list_media(&state.db)?;
    Ok(Json(items))
}

/// POST /api/media
pub async fn create_media(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<CreateMediaRequest>,
) -> ApiResult<(StatusCode, Json<MediaItem>)> {
    let input = request.validate()?;
    let item = media::create_media(&state.db, &input)?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// DELETE /api/media/:id
pub async fn delete_media(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<SuccessResponse>> {
    media::delete_media(&state.db, id)?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/media/delete-many
pub async fn delete_many_media(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<DeleteManyRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    media::delete_many_media(&state.db, &request.ids)?;
    Ok(Json(SuccessResponse::ok()))
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
