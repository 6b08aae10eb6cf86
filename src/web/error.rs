use crate::models::ValidationError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("internal error: {0}")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Oversized bodies and wrong content types keep their own status codes.
        match rejection.status() {
            status @ (StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNSUPPORTED_MEDIA_TYPE) => {
                Self::Rejected {
                    status,
                    message: rejection.body_text(),
                }
            }
            _ => Self::BadRequest(rejection.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(err) => {
                let body = serde_json::json!({
                    "message": err.to_string(),
                    "field": err.field(),
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::BadRequest(message) => {
                let body = serde_json::json!({ "message": message });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::Rejected { status, message } => {
                let body = serde_json::json!({ "message": message });
                (status, Json(body)).into_response()
            }
            Self::Internal(err) => {
                tracing::error!("Application error: {:?}", err);
                let body = serde_json::json!({ "message": "Internal server error" });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
