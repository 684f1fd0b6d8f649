use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{service}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Auth errors
/// - E2xxx: Profile errors
/// - E3xxx: Discovery errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    Forbidden,
    BadRequest,
    ServiceUnavailable,
    StorageUnavailable,

    // Auth (E1xxx)
    TokenExpired,
    TokenInvalid,

    // Profile (E2xxx)
    ProfileNotFound,
    InvalidProfile,

    // Discovery (E3xxx)
    SelfSwipe,
    SwipeTargetNotFound,
    MatchNotFound,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::Forbidden => "E0005",
            Self::BadRequest => "E0006",
            Self::ServiceUnavailable => "E0007",
            Self::StorageUnavailable => "E0008",

            // Auth
            Self::TokenExpired => "E1001",
            Self::TokenInvalid => "E1002",

            // Profile
            Self::ProfileNotFound => "E2001",
            Self::InvalidProfile => "E2002",

            // Discovery
            Self::SelfSwipe => "E3001",
            Self::SwipeTargetNotFound => "E3002",
            Self::MatchNotFound => "E3003",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable | Self::StorageUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::ValidationError | Self::BadRequest | Self::InvalidProfile => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound | Self::ProfileNotFound | Self::SwipeTargetNotFound
            | Self::MatchNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden | Self::SelfSwipe => StatusCode::FORBIDDEN,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Persistence backend failure, surfaced as a distinct kind so callers
    /// can apply their own retry policy. The core never retries internally.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageUnavailable, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message, details } => {
                let status = code.status_code();
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                match err {
                    diesel::result::Error::NotFound => (
                        StatusCode::NOT_FOUND,
                        ApiErrorResponse::new("E0003", "resource not found"),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiErrorResponse::new("E0001", "database error"),
                    ),
                }
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new("E0002", msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
