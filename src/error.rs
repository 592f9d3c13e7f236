/// Unified error handling module
///
/// Component-level failures (validation, hashing, token checks, store
/// operations, upstream fetches) surface as typed values and are mapped
/// exactly once, at the actix boundary, to the documented HTTP status and a
/// stable JSON body.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// Validation errors for request input
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyField(&'static str),
    TooLong(&'static str, usize),
    InvalidFormat(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::InvalidFormat(field) => write!(f, "{} has invalid format", field),
        }
    }
}

impl StdError for ValidationError {}

/// Authentication and authorization errors
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Wrong password or unknown email. One variant for both so the
    /// responses cannot be told apart (account enumeration).
    InvalidCredentials,
    DuplicateEmail,
    InvalidToken,
    MissingToken,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "incorrect email or password"),
            AuthError::DuplicateEmail => write!(f, "email already in use"),
            AuthError::InvalidToken => write!(f, "invalid or expired token"),
            AuthError::MissingToken => write!(f, "missing authentication token"),
        }
    }
}

impl StdError for AuthError {}

/// User store operation errors
#[derive(Debug)]
pub enum StoreError {
    Connection(String),
    Query(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Connection(msg) => write!(f, "database connection error: {}", msg),
            StoreError::Query(msg) => write!(f, "database query error: {}", msg),
        }
    }
}

impl StdError for StoreError {}

/// Upstream quote page fetch errors
#[derive(Debug)]
pub enum FetchError {
    Upstream(String),
    MissingRate,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Upstream(msg) => write!(f, "failed to fetch quote page: {}", msg),
            FetchError::MissingRate => write!(f, "quote page did not contain a dollar rate"),
        }
    }
}

impl StdError for FetchError {}

/// Central error type that all application errors map to
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Auth(AuthError),
    Store(StoreError),
    Fetch(FetchError),
    Config(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Store(e) => write!(f, "{}", e),
            AppError::Fetch(e) => write!(f, "{}", e),
            AppError::Config(msg) => write!(f, "configuration error: {}", msg),
            AppError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::Fetch(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            // The only unique index in the schema is users.email, so a
            // uniqueness violation always means a duplicate registration.
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::Auth(AuthError::DuplicateEmail)
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::Store(StoreError::Connection(err.to_string()))
            }
            _ => AppError::Store(StoreError::Query(err.to_string())),
        }
    }
}

/// Error response body for HTTP responses
///
/// Deliberately free of per-request randomness: two identical failures
/// produce byte-equal bodies, so login failures stay indistinguishable.
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Auth(AuthError::InvalidCredentials) => "INVALID_CREDENTIALS",
            AppError::Auth(AuthError::DuplicateEmail) => "DUPLICATE_EMAIL",
            AppError::Auth(AuthError::InvalidToken) => "TOKEN_INVALID",
            AppError::Auth(AuthError::MissingToken) => "MISSING_TOKEN",
            AppError::Store(_) => "STORE_ERROR",
            AppError::Fetch(_) => "UPSTREAM_FETCH_FAILURE",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message exposed to the client. Store, config, and internal errors get
    /// a generic message; their detail goes to the log only.
    fn public_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Auth(e) => e.to_string(),
            AppError::Fetch(_) => "failed to retrieve dollar value".to_string(),
            AppError::Store(_) | AppError::Config(_) | AppError::Internal(_) => {
                "internal server error".to_string()
            }
        }
    }

    fn log(&self) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(error = %e, "validation rejected request");
            }
            AppError::Auth(AuthError::DuplicateEmail) => {
                tracing::warn!("duplicate registration attempt");
            }
            AppError::Auth(e) => {
                tracing::warn!(error = %e, "authentication failure");
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "user store failure");
            }
            AppError::Fetch(e) => {
                tracing::error!(error = %e, "upstream fetch failure");
            }
            AppError::Config(msg) => {
                tracing::error!(error = %msg, "configuration error");
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(e) => match e {
                AuthError::DuplicateEmail => StatusCode::CONFLICT,
                AuthError::InvalidCredentials
                | AuthError::InvalidToken
                | AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            },
            AppError::Store(StoreError::Connection(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(StoreError::Query(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.log();

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            code: self.code(),
            message: self.public_message(),
        })
    }
}

/// Per-request logging context
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub request_id: String,
    pub operation: &'static str,
}

impl ErrorContext {
    pub fn new(operation: &'static str) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            operation,
        }
    }
}
