use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Username already taken")]
    Conflict,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

// Axum IntoResponse implementation for HTTP errors
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, body) = match &self {
            AppError::Validation { field, message } => {
                // The submitted value is never part of the message, only the
                // field name and the rule that failed.
                tracing::warn!(field, "validation failed: {}", message);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    serde_json::json!({ "error": message, "field": field }),
                )
            }
            AppError::Conflict => (
                StatusCode::CONFLICT,
                serde_json::json!({ "error": self.to_string() }),
            ),
            AppError::InvalidCredentials | AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "error": self.to_string() }),
            ),
            AppError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": self.to_string() }),
            ),
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                tracing::error!("request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
