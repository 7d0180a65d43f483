//! HTTP mapping for `AppError`.
//!
//! Clients only ever see a status code and its canonical reason phrase;
//! the detail goes to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sb_core::error::AppError;

pub type WebResult<T> = Result<T, WebError>;

#[derive(Debug)]
pub struct WebError(pub AppError);

impl From<AppError> for WebError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

pub(crate) fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::ClientInput(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound => StatusCode::NOT_FOUND,
        AppError::DuplicateEmail | AppError::InvalidCredentials => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if self.0.is_client_error() {
            tracing::debug!(error = %self.0, %status, "client error");
        } else {
            tracing::error!(error = %self.0, "request failed");
        }
        let reason = status.canonical_reason().unwrap_or("Error");
        (status, reason).into_response()
    }
}
