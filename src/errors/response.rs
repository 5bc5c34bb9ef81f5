use axum::{
    response::{IntoResponse, Response, Json},
    http::StatusCode,
};
use serde_json::json;
use crate::errors::AppError;

impl AppError {
    /// Default status for each error kind. Routes with a different
    /// contract override it through [`ApiError::with_status`].
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            // Existing clients expect 404 for an already registered user
            AppError::Duplicate(_) => StatusCode::NOT_FOUND,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Body key used for the error text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKey {
    Error,
    Message,
}

/// An [`AppError`] bound to the status and body shape of one route.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    key: BodyKey,
    error: AppError,
    message: Option<String>,  // replaces the error text in the body
}

impl ApiError {
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Render as `{"message": ...}` instead of `{"error": ...}`.
    pub fn as_message(mut self) -> Self {
        self.key = BodyKey::Message;
        self
    }

    /// Show `message` to the client instead of the error's own text.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self {
            status: error.status_code(),
            key: BodyKey::Error,
            error,
            message: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let AppError::Persistence(e) = &self.error {
            tracing::error!("Storage failure surfaced to client: {}", e);
        }

        let text = self.message.unwrap_or_else(|| self.error.to_string());
        let body = match self.key {
            BodyKey::Error => json!({ "error": text }),
            BodyKey::Message => json!({ "message": text }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
