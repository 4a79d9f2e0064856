use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde::Serialize;
use serde_json::json;

/// One offending request field, reported alongside every other offending
/// field so a rejected filter never partially applies.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Environment variable not set: {0}")]
    EnvironmentVariableNotSetError(String),
    #[error("File read error, {0}")]
    FileReadError(String),
    #[error("Database url parsing error")]
    DatabaseParsingError,
    #[error("Database connection error")]
    DatabaseConnectionError,
    #[error("Failed to fetch {resource} with ID {id}")]
    DatabaseFetchError { resource: String, id: String },
    #[error("Failed to delete {resource} with ID {id}")]
    DatabaseDeleteError { resource: String, id: String },
    #[error("Sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("You're not authorized!")]
    UnauthorizedError,
    #[error("You don't own this resource")]
    ForbiddenError,
    #[error("{0}")]
    NotFoundError(String),
    #[error("Invalid uuid format: {0}")]
    UuidParseError(#[from] uuid::Error),
    #[error("Url parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
    #[error("Invalid filters")]
    InvalidFilters { details: Vec<FieldError> },
    #[error("Invalid coordinates: lat must be in [-90, 90], lng must be in [-180, 180]")]
    InvalidCoordinatesError,
    #[error("Validation error, {0}")]
    ValidationError(String),
    #[error("Validation errors, {0}")]
    ValidatorValidationErrors(#[from] validator::ValidationErrors),
    #[error("Serde json error")]
    SerdejsonError(#[from] serde_json::Error),
    #[error("IO error, {0}")]
    IoError(#[from] std::io::Error),
    #[error("Internal error, {0}")]
    InternalError(String),
    #[error("External service error, {0}")]
    ExternalServiceError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::InvalidFilters { details } => {
                let body = Json(json!({"error": "Invalid filters", "details": details}));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            Self::EnvironmentVariableNotSetError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Environment variable not set: {}", e),
            ),
            Self::FileReadError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e),
            Self::DatabaseParsingError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database url parsing error".to_string(),
            ),
            Self::DatabaseConnectionError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database connection error".to_string(),
            ),
            Self::DatabaseFetchError { resource, id } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Failed to fetch {resource} with ID {id}"),
            ),
            Self::DatabaseDeleteError { resource, id } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Failed to delete {resource} with ID {id}"),
            ),
            Self::SqlxError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Self::RedisError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Self::Request(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Self::UnauthorizedError => (StatusCode::UNAUTHORIZED, "Unauthorized!".to_string()),
            Self::ForbiddenError => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            Self::NotFoundError(e) => (StatusCode::NOT_FOUND, e),
            Self::UuidParseError(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Invalid uuid format, {}", e),
            ),
            Self::UrlParseError(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Url parse error, {}", e),
            ),
            Self::InvalidCoordinatesError => (
                StatusCode::BAD_REQUEST,
                "Invalid coordinates: lat must be in [-90, 90], lng must be in [-180, 180]"
                    .to_string(),
            ),
            Self::ValidationError(e) => (StatusCode::UNPROCESSABLE_ENTITY, e),
            Self::ValidatorValidationErrors(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            Self::SerdejsonError(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            Self::IoError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Self::InternalError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e),
            Self::ExternalServiceError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e),
        };

        let body = Json(json!({"error": error_message}));

        (status, body).into_response()
    }
}
