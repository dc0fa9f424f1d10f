//! Stable error codes for API clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Db(String),

    #[error("Validation failed: {field} {reason}")]
    Validation { field: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unknown sport club id(s): {}", .0.join(", "))]
    UnknownClubs(Vec<String>),
}

impl AppError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Db(_) => "DB_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::UnknownClubs(_) => "UNKNOWN_CLUBS",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::UnknownClubs(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn to_serde(&self) -> AppErrorDto {
        let details = match self {
            Self::Validation { field, reason } => Some(json!({ "field": field, "reason": reason })),
            Self::UnknownClubs(ids) => Some(json!({ "ids": ids })),
            _ => None,
        };
        AppErrorDto {
            code: self.code().to_string(),
            message: self.to_string(),
            details,
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Db(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Db(msg) = &self {
            log::error!("database error: {}", msg);
        }
        (self.status(), Json(self.to_serde())).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct AppErrorDto {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}
