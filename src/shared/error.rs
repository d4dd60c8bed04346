use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    AlreadyInTargetState(String),
    Forbidden(String),
    NotFound(String),
    Storage(String),
    ConfigurationError(String),
    Internal(String),
}

impl AppError {
    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        AppError::NotFound(format!("{entity} {id} does not exist"))
    }

    pub fn forbidden(actor: impl fmt::Display, entity: impl fmt::Display) -> Self {
        AppError::Forbidden(format!("actor {actor} may not edit {entity}"))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::AlreadyInTargetState(msg) => write!(f, "Already in target state: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<crate::domain::entities::TransitionError> for AppError {
    fn from(err: crate::domain::entities::TransitionError) -> Self {
        AppError::AlreadyInTargetState(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Internal(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
