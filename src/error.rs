use actix_web::error::{JsonPayloadError, PathError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

/// Every failure a handler can report, mapped onto the error envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Unauthorized { code: &'static str, message: String },

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn missing_token() -> Self {
        AppError::Unauthorized {
            code: "authorization_required",
            message: "Request does not contain an access token".to_string(),
        }
    }

    pub fn token_expired() -> Self {
        AppError::Unauthorized {
            code: "token_expired",
            message: "The token has expired".to_string(),
        }
    }

    pub fn invalid_token() -> Self {
        AppError::Unauthorized {
            code: "invalid_token",
            message: "Signature verification failed".to_string(),
        }
    }

    /// Same body for an unknown email and a wrong password.
    pub fn invalid_credentials() -> Self {
        AppError::Unauthorized {
            code: "invalid_credentials",
            message: "Invalid email or password".to_string(),
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            AppError::Unauthorized { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Message shown to the caller; server faults never leak their cause.
    fn public_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!(error = ?e, "Database error");
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(message = %msg, "Internal error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), message = %self, "Request rejected");
        }

        HttpResponse::build(status).json(ErrorBody {
            status: "error",
            message: self.public_message(),
            code: self.code(),
        })
    }
}

/// Malformed JSON bodies get the same envelope as every other 400.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(format!("Invalid JSON body: {err}")).into()
}

/// Unparseable ids in the path cannot name an existing record.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::not_found(format!("Invalid identifier: {err}")).into()
}
