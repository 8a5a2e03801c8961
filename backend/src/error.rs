//! Error handling for the Glass Rental Management Platform
//!
//! Every failure a caller can act on has its own variant so that "not enough
//! stock", "not found" and "duplicate" never collapse into a generic error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    DuplicateKey(String),

    // Stock accounting errors
    #[error(
        "Insufficient inventory. Only {available} available for {glassware_type}, requested {requested}"
    )]
    InsufficientStock {
        glassware_type: String,
        requested: i32,
        available: i32,
    },

    #[error("Invalid stock adjustment for {glassware_type}: {message}")]
    InvalidAdjustment {
        glassware_type: String,
        current_stock: i32,
        quantity_change: i32,
        message: String,
    },

    #[error("Concurrent modification: {0}")]
    Conflict(String),

    // Storage errors
    #[error("Persistence failure during {step}: {source}")]
    Persistence {
        step: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::from_store("storage", err)
    }
}

impl AppError {
    /// Classify a store error, keeping the failed step for persistence failures
    pub fn from_store(step: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(entity) => AppError::NotFound(entity.to_string()),
            StoreError::DuplicateKey(field) => AppError::DuplicateKey(field),
            StoreError::Conflict(what) => AppError::Conflict(what.to_string()),
            other => AppError::Persistence {
                step,
                source: other,
            },
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let (field, message) = errors
            .field_errors()
            .into_iter()
            .next()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                (field.to_string(), message)
            })
            .unwrap_or_else(|| ("input".to_string(), "Invalid input".to_string()));
        AppError::Validation { field, message }
    }
}

/// Attach the failed step to store results
pub trait StoreResultExt<T> {
    fn during(self, step: &'static str) -> AppResult<T>;
}

impl<T> StoreResultExt<T> for Result<T, StoreError> {
    fn during(self, step: &'static str) -> AppResult<T> {
        self.map_err(|err| AppError::from_store(step, err))
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<i32>,
}

impl ErrorDetail {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
            requested: None,
            available: None,
        }
    }

    fn with_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateKey(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InsufficientStock { .. } | AppError::InvalidAdjustment { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Persistence {
                source: StoreError::Timeout(_),
                ..
            } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Persistence { .. } | AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn detail(&self) -> ErrorDetail {
        match self {
            AppError::InvalidCredentials => {
                ErrorDetail::new("INVALID_CREDENTIALS", "Invalid email or password")
            }
            AppError::Unauthorized(message) => ErrorDetail::new("UNAUTHORIZED", message.clone()),
            AppError::Validation { field, message } => {
                ErrorDetail::new("VALIDATION_ERROR", message.clone()).with_field(field)
            }
            AppError::NotFound(resource) => {
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource))
            }
            AppError::DuplicateKey(field) => ErrorDetail::new(
                "DUPLICATE_ENTRY",
                format!("A record with this {} already exists", field),
            )
            .with_field(field),
            AppError::InsufficientStock {
                requested,
                available,
                ..
            } => ErrorDetail {
                requested: Some(*requested),
                available: Some(*available),
                ..ErrorDetail::new("INSUFFICIENT_STOCK", self.to_string())
            },
            AppError::InvalidAdjustment { message, .. } => {
                ErrorDetail::new("INVALID_ADJUSTMENT", message.clone())
            }
            AppError::Conflict(message) => ErrorDetail::new(
                "CONFLICT",
                format!("{} was changed concurrently, please retry", message),
            ),
            AppError::Persistence {
                source: StoreError::Timeout(step),
                ..
            } => ErrorDetail::new(
                "STORAGE_TIMEOUT",
                format!("The data store did not respond in time ({})", step),
            ),
            AppError::Persistence { step, .. } => ErrorDetail::new(
                "PERSISTENCE_ERROR",
                format!("A storage error occurred during {}", step),
            ),
            AppError::Configuration(msg) => {
                ErrorDetail::new("CONFIGURATION_ERROR", format!("Configuration error: {}", msg))
            }
            AppError::Internal(_) => {
                ErrorDetail::new("INTERNAL_ERROR", "An internal server error occurred")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: self.detail() })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
