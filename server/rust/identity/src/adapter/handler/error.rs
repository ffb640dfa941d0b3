//! identity サーバーの構造化エラー。
//!
//! エラーコードは `SYS_IDENTITY_{ERROR}` 形式で、レスポンスは
//! `{ "error": { "code", "message", "request_id", "details" } }` の封筒で返す。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::usecase::search_changes_log::SearchChangesLogError;
use crate::usecase::PermissionsForRoleError;

const SERVICE: &str = "IDENTITY";

/// ErrorCode は `SYS_IDENTITY_{ERROR}` 形式のエラーコード。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorCode(String);

impl ErrorCode {
    pub fn new(error: &str) -> Self {
        Self(format!("SYS_{SERVICE}_{error}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// ErrorDetail はフィールド単位の補足情報。
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub field: String,
    pub reason: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    pub request_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::with_details(code, message, vec![])
    }

    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: Vec<ErrorDetail>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
                request_id: uuid::Uuid::new_v4().to_string(),
                details,
            },
        }
    }
}

/// ServiceError は HTTP ステータスに対応づくハンドラのエラー。
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// 404 Not Found
    #[error("{message}")]
    NotFound { code: ErrorCode, message: String },

    /// 400 Bad Request
    #[error("{message}")]
    BadRequest {
        code: ErrorCode,
        message: String,
        details: Vec<ErrorDetail>,
    },

    /// 401 Unauthorized
    #[error("{message}")]
    Unauthorized { code: ErrorCode, message: String },

    /// 403 Forbidden
    #[error("{message}")]
    Forbidden { code: ErrorCode, message: String },

    /// 409 Conflict
    #[error("{message}")]
    Conflict { code: ErrorCode, message: String },

    /// 500 Internal Server Error
    #[error("{message}")]
    Internal { code: ErrorCode, message: String },
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            code: ErrorCode::new("NOT_FOUND"),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: ErrorCode::new("VALIDATION_FAILED"),
            message: message.into(),
            details: vec![],
        }
    }

    pub fn unauthorized(error: &str, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: ErrorCode::new(error),
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            code: ErrorCode::new("PERMISSION_DENIED"),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            code: ErrorCode::new("CONFLICT"),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::new("INTERNAL_ERROR"),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ServiceError::Conflict { .. } => StatusCode::CONFLICT,
            ServiceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            ServiceError::NotFound { code, message }
            | ServiceError::Unauthorized { code, message }
            | ServiceError::Forbidden { code, message }
            | ServiceError::Conflict { code, message }
            | ServiceError::Internal { code, message } => {
                ErrorResponse::new(code.clone(), message.clone())
            }
            ServiceError::BadRequest {
                code,
                message,
                details,
            } => ErrorResponse::with_details(code.clone(), message.clone(), details.clone()),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if let ServiceError::Internal { ref message, .. } = self {
            tracing::error!(error = %message, "request failed with internal error");
        }
        (self.status(), Json(self.to_error_response())).into_response()
    }
}

impl From<PermissionsForRoleError> for ServiceError {
    fn from(error: PermissionsForRoleError) -> Self {
        match error {
            PermissionsForRoleError::NotFound(_) => ServiceError::not_found(error.to_string()),
            PermissionsForRoleError::AlreadyExists(_) => ServiceError::conflict(error.to_string()),
            PermissionsForRoleError::Validation(_) => ServiceError::bad_request(error.to_string()),
            PermissionsForRoleError::Internal(_) => ServiceError::internal(error.to_string()),
        }
    }
}

impl From<SearchChangesLogError> for ServiceError {
    fn from(error: SearchChangesLogError) -> Self {
        match error {
            SearchChangesLogError::Validation(_) => ServiceError::bad_request(error.to_string()),
            SearchChangesLogError::Internal(_) => ServiceError::internal(error.to_string()),
        }
    }
}
