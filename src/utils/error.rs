use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::utils::response::error as error_response;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
        details: Option<Value>,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Duplicate resource: {0}")]
    DuplicateResource(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError {
            message: message.into(),
            details: None,
        }
    }

    pub fn user_not_found(id: i64) -> Self {
        AppError::NotFound(format!("User not found with ID: {}", id))
    }

    pub fn user_not_found_by_email(email: &str) -> Self {
        AppError::NotFound(format!("User not found with email: {}", email))
    }

    pub fn duplicate_email(email: &str) -> Self {
        AppError::DuplicateResource(format!("User with email {} already exists", email))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateResource(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError { .. } => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DuplicateResource(_) => "DUPLICATE_RESOURCE",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError { message, .. } => {
                warn!(message = %message, "Rejected request");
            }
            AppError::NotFound(msg) | AppError::DuplicateResource(msg) => {
                warn!(code = self.code(), message = %msg, "Request failed");
            }
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Infrastructure failures never leak their cause to the client
        let (public_message, details) = match self {
            AppError::ValidationError { message, details } => (message, details),
            AppError::NotFound(msg) | AppError::DuplicateResource(msg) => (msg, None),
            AppError::DatabaseError(_) => ("A database error occurred".to_string(), None),
        };

        error_response(code, public_message, details, status)
    }
}
