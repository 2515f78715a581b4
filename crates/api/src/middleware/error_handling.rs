//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and `{"error": "..."}` bodies so
//! every handler reports failures the same way.
//!
//! Client errors carry their message through. Storage and internal failures
//! are logged with their cause and answered with an opaque message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use konsul_core::errors::{KonsulError, StorageError};
use serde_json::json;
use tracing::error;

const OPAQUE_MESSAGE: &str = "internal server error";

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use konsul_api::middleware::error_handling::AppError;
/// use konsul_core::errors::KonsulError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(KonsulError::NotFound("user".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub KonsulError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            KonsulError::Slot(_) | KonsulError::Schedule(_) | KonsulError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            KonsulError::Authentication(_) => StatusCode::UNAUTHORIZED,
            KonsulError::Authorization(_) => StatusCode::FORBIDDEN,
            KonsulError::NotFound(_) => StatusCode::NOT_FOUND,
            KonsulError::Conflict(_) => StatusCode::CONFLICT,
            KonsulError::Storage(_) | KonsulError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if self.0.is_client_error() {
            self.0.to_string()
        } else {
            error!(error = ?self.0, "Request failed");
            OPAQUE_MESSAGE.to_string()
        };
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

impl From<KonsulError> for AppError {
    fn from(err: KonsulError) -> Self {
        AppError(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError(KonsulError::Storage(err))
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(KonsulError::Internal(err))
    }
}

/// Maps a KonsulError straight to an HTTP response
pub fn map_error(err: KonsulError) -> Response {
    AppError(err).into_response()
}

/// Answers errors raised by the tower layers wrapped around the router.
pub async fn handle_layer_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        let body = Json(json!({ "error": "request timed out" }));
        return (StatusCode::REQUEST_TIMEOUT, body).into_response();
    }

    map_error(KonsulError::Internal(eyre::eyre!("unhandled layer error: {err}")))
}
