use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};
use serde_json::json;
use tracing::error;

/// Message returned for every failure the caller cannot act on.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    AuthError(#[from] AuthError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Mail error: {0}")]
    MailError(#[from] MailError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl AppError {
    /// Text placed in the `message` field of the JSON error body.
    ///
    /// Domain errors are specific; everything else collapses to
    /// [`SERVER_ERROR_MESSAGE`] so store and relay details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::AuthError(e) => e.to_string(),
            AppError::ValidationError(msg) => msg.clone(),
            AppError::DatabaseError(DatabaseError::NotFound) => DatabaseError::NotFound.to_string(),
            _ => SERVER_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::DatabaseError(DatabaseError::NotFound),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::DatabaseError(DatabaseError::Duplicate)
            }
            _ => AppError::DatabaseError(DatabaseError::QueryError(err.to_string())),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::DatabaseError(DatabaseError::MigrationError(err.to_string()))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::InternalError(format!("password hashing failed: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::InternalError(format!("token signing failed: {}", err))
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::ValidationError(format!("Invalid form data: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("blocking task failed: {}", err))
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        HttpResponse::build(status).json(json!({ "message": self.public_message() }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthError(e) => match e {
                AuthError::DuplicateEmail => StatusCode::BAD_REQUEST,
                AuthError::UnknownEmail => StatusCode::BAD_REQUEST,
                AuthError::NotFound => StatusCode::NOT_FOUND,
                AuthError::BadCredentials => StatusCode::UNAUTHORIZED,
                AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
                AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::InvalidOrExpiredToken => StatusCode::BAD_REQUEST,
            },
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(DatabaseError::NotFound) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Email already in use")]
    DuplicateEmail,

    /// No admin is registered under the submitted email.
    #[error("User not found")]
    UnknownEmail,

    /// The admin referenced by a valid token no longer exists.
    #[error("User not found")]
    NotFound,

    #[error("Incorrect password")]
    BadCredentials,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid or expired link")]
    InvalidOrExpiredToken,
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Message build failed: {0}")]
    Build(String),

    #[error("Relay error: {0}")]
    Relay(String),
}
