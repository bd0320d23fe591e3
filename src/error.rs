//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure surfaces through it: the services return it, the auth middleware and
//! extractors return it, and the actix extractor error handlers are routed into it.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so a handler returning
//! `Err(AppError)` is rendered as the uniform `{ "success": false, "error": ... }`
//! envelope with the matching status code. Server-side failures are logged in full
//! and reported to the client only as a generic message.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;
use validator::ValidationErrors;

use crate::response::ApiResponse;

/// Message returned to clients for any 5xx failure.
pub const GENERIC_SERVER_ERROR: &str = "Server Error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// A unique resource already exists, e.g. a registered email.
    /// Reported as HTTP 400, not 409.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Missing, invalid or expired token, or bad credentials (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Role or ownership violation (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// A requested resource was not found (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// An unexpected server-side error (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// An error originating from the store (HTTP 500).
    #[error("Database Error: {0}")]
    DatabaseError(String),
}

impl AppError {
    /// Message placed in the response envelope. Never exposes internals.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => msg,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => GENERIC_SERVER_ERROR,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code())
            .json(ApiResponse::<()>::error(self.public_message()))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// A unique-index violation can only come from `users.email`, so it becomes the
/// duplicate-registration conflict. Everything else is a database error.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("User already exists".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(format!("Migration failed: {}", error))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::BadRequest`.
///
/// The first failing field (alphabetically, for stable output) supplies the message.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.iter().collect();
        fields.sort_by_key(|(field, _)| **field);

        let message = fields
            .into_iter()
            .find_map(|(field, errs)| {
                errs.first().map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for '{}'", field),
                })
            })
            .unwrap_or_else(|| errors.to_string());

        AppError::BadRequest(message)
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {}", error))
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> AppError {
        AppError::InternalServerError(format!("Background task failed: {}", error))
    }
}
