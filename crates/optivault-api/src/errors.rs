use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use optivault_stats::StatsError;

use crate::dto::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    DbError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Internal server error")]
    InternalServerError,
}

impl ApiError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::DbError(_) | Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StatsError> for ApiError {
    fn from(err: StatsError) -> Self {
        tracing::error!(error = %err, "Failed to read vault data");
        match err {
            // Only the operation name leaks, never the driver message.
            StatsError::Store(e) => Self::DbError(e.operation),
            StatsError::Price(_) | StatsError::InvalidData(_) => Self::InternalServerError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope: ApiResponse<()> = ApiResponse::error(self.to_string());
        (self.status_code(), Json(envelope)).into_response()
    }
}
