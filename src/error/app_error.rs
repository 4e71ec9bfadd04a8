use crate::models::messages;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    /// Required form fields are missing; nothing was sent to the backend.
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),
    /// The backend answered but refused the operation.
    #[error("Request rejected ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },
    /// 403 from an admin-only endpoint.
    #[error("Forbidden")]
    Forbidden,
    #[error("No active session")]
    NoSession,
    #[error("User {0} not found")]
    UserNotFound(i64),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        #[source]
        source: figment::Error,
    },
}

impl AppError {
    pub fn storage(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            message: message.into(),
            source,
        }
    }

    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::Rejected { status, message }
    }

    /// Network and transport failures, as opposed to answers from the backend.
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Connection(_) | AppError::Http(_))
    }

    /// Text shown inline next to the form or panel that triggered the request.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Validation(message) => message.clone(),
            AppError::ValidationError(_) => messages::FIELDS_REQUIRED.to_string(),
            AppError::Rejected { message: Some(message), .. } if !message.trim().is_empty() => message.clone(),
            AppError::Connection(_) | AppError::Http(_) => messages::CONNECTION_ERROR.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::ConfigurationError {
            message: "Failed to read configuration".to_string(),
            source: e,
        }
    }
}
