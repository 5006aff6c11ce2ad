//! Application layer errors
//!
//! Error types for application-level operations.

use std::fmt;

use crate::error::Error;

/// Application layer error types
#[derive(Debug)]
pub enum ApplicationError {
    /// Validation error with field and message
    Validation { field: String, message: String },
    /// Entity not found
    NotFound { entity: String, id: String },
    /// Authorization error
    Unauthorized { resource: String, action: String },
    /// Domain error wrapper
    Domain(Error),
}

impl ApplicationError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Unauthorized {
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// Field name for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { field, message } => {
                write!(f, "Validation error for '{}': {}", field, message)
            }
            Self::NotFound { entity, id } => {
                write!(f, "{} with id '{}' not found", entity, id)
            }
            Self::Unauthorized { resource, action } => {
                write!(f, "Not authorized to {} {}", action, resource)
            }
            Self::Domain(e) => write!(f, "Domain error: {}", e),
        }
    }
}

impl std::error::Error for ApplicationError {}

impl From<Error> for ApplicationError {
    fn from(error: Error) -> Self {
        Self::Domain(error)
    }
}

impl From<ApplicationError> for Error {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::Domain(inner) => inner,
            ApplicationError::NotFound { entity, id } if entity == "Project" => {
                Error::ProjectNotFound(id)
            }
            unauthorized @ ApplicationError::Unauthorized { .. } => {
                Error::Other(unauthorized.to_string())
            }
            other => Error::InvalidInput(other.to_string()),
        }
    }
}

/// Result type for application operations
pub type AppResult<T> = Result<T, ApplicationError>;
