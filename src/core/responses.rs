use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use anyhow::Error;
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq)]
pub enum AppErrorType {
    NotFoundError,
    DbError,
    AuthError,
    PayloadValidationError,
    NetworkError,
    InternalServerError,
    ForbiddenError,
    HashingFailed,
}

#[derive(Debug, PartialEq)]
pub struct AppError {
    pub error_type: AppErrorType,
    pub message: Option<String>,
    pub cause: Option<String>,
}

#[derive(Serialize)]
pub struct AppErrorResponse {
    pub success: bool,
    pub message: String,
}

impl AppError {
    pub fn message(&self) -> String {
        match &*self {
            AppError {
                message: Some(message),
                ..
            } => message.clone(),

            AppError {
                message: None,
                error_type: AppErrorType::NotFoundError,
                ..
            } => "The requested item was not found".to_string(),
            _ => "An unexpected error has occurred".to_string(),
        }
    }

    pub fn db_error(error: impl ToString) -> AppError {
        AppError {
            cause: Some(error.to_string()),
            error_type: AppErrorType::DbError,
            message: Some("Store operation failed".to_string()),
        }
    }

    pub fn not_found(message: impl ToString) -> AppError {
        AppError {
            cause: None,
            error_type: AppErrorType::NotFoundError,
            message: Some(message.to_string()),
        }
    }

    pub fn forbidden_error(error: impl ToString) -> AppError {
        AppError {
            cause: Some(error.to_string()),
            error_type: AppErrorType::ForbiddenError,
            message: Some(error.to_string()),
        }
    }

    pub fn unauthorized(error: impl ToString) -> AppError {
        AppError {
            cause: Some(error.to_string()),
            error_type: AppErrorType::AuthError,
            message: Some(error.to_string()),
        }
    }

    pub fn validation_error(error: impl ToString) -> AppError {
        AppError {
            cause: Some(error.to_string()),
            error_type: AppErrorType::PayloadValidationError,
            message: Some(error.to_string()),
        }
    }

    pub fn internal_error(error: impl ToString) -> AppError {
        AppError {
            cause: Some(error.to_string()),
            error_type: AppErrorType::InternalServerError,
            message: Some(error.to_string()),
        }
    }

    /// Store write failed mid-enrollment. Retryable from the caller's side;
    /// the message stays generic on purpose.
    pub fn enrollment_write_failed(error: impl ToString) -> AppError {
        AppError {
            cause: Some(error.to_string()),
            error_type: AppErrorType::DbError,
            message: Some("Could not complete enrollment, please try again".to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: Error) -> Self {
        AppError {
            message: None,
            cause: Some(error.to_string()),
            error_type: AppErrorType::InternalServerError,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        AppError {
            cause: Some(error.to_string()),
            error_type: AppErrorType::DbError,
            message: Some("Store operation failed".to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> Self {
        AppError {
            error_type: AppErrorType::HashingFailed,
            message: Some(format!("Hashing failed: {}", error)),
            cause: None,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self.error_type {
            AppErrorType::AuthError => StatusCode::UNAUTHORIZED,
            AppErrorType::DbError
            | AppErrorType::NetworkError
            | AppErrorType::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            AppErrorType::NotFoundError => StatusCode::NOT_FOUND,
            AppErrorType::PayloadValidationError => StatusCode::BAD_REQUEST,
            AppErrorType::ForbiddenError => StatusCode::FORBIDDEN,
            AppErrorType::HashingFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(AppErrorResponse {
            success: false,
            message: self.message(),
        })
    }
}

#[derive(Serialize)]
pub struct AppSuccessResponse<T> {
    pub success: bool,
    pub data: T,
    pub message: String,
}
