use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use marquee_core::error::{ApiError, ErrorEnvelope};
use marquee_metadata::MetadataError;
use tracing::error;

/// Newtype wrapper so we can implement `IntoResponse` in this crate.
pub struct AppError(pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope::from(&self.0);
        (status, Json(envelope)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl From<MetadataError> for AppError {
    fn from(e: MetadataError) -> Self {
        error!(error = %e, "lookup failed");
        Self(ApiError::Internal(e.to_string()))
    }
}
