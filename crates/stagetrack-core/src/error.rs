//! Error types for Stagetrack

use thiserror::Error;

/// Result type alias using Stagetrack's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Stagetrack error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Entity errors (E001-E099)
    #[error("Project '{0}' not found. Run `stagetrack projects list` to see all projects.")]
    ProjectNotFound(String),

    #[error("Stage '{0}' not found.")]
    StageNotFound(String),

    #[error("Milestone {1} not found in stage '{0}'.")]
    MilestoneNotFound(String, i64),

    // Session errors (E100-E199)
    #[error("Role '{0}' has view-only access and cannot edit projects.")]
    ReadOnlyRole(String),

    #[error("Total stage weight cannot exceed {1}% (would be {0}%).")]
    WeightLimitExceeded(f64, f64),

    #[error("Invalid weight '{0}'. Weight must be a non-negative number.")]
    InvalidWeight(String),

    // Schedule errors (E200-E299)
    #[error("Please enter both Planned Start Date and Planned End Date first.")]
    MissingProjectDates,

    #[error("Invalid date range. Start date {0} must be on or before end date {1}.")]
    InvalidDateRange(String, String),

    #[error("No stages found to calculate dates for.")]
    NoStages,

    // Database errors (E400-E499)
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProjectNotFound(_) => "E001",
            Self::StageNotFound(_) => "E002",
            Self::MilestoneNotFound(..) => "E003",
            Self::ReadOnlyRole(_) => "E100",
            Self::WeightLimitExceeded(..) => "E101",
            Self::InvalidWeight(_) => "E102",
            Self::MissingProjectDates => "E200",
            Self::InvalidDateRange(..) => "E201",
            Self::NoStages => "E202",
            Self::DatabaseError(_) => "E400",
            Self::Serialization(_) => "E401",
            Self::InvalidInput(_) => "E800",
            Self::Other(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ProjectNotFound(_) => Some("stagetrack projects list".to_string()),
            Self::StageNotFound(_) => Some("stagetrack projects show <project>".to_string()),
            Self::MissingProjectDates => {
                Some("stagetrack plan <project> --start <YYYY-MM-DD> --end <YYYY-MM-DD>".to_string())
            }
            Self::WeightLimitExceeded(..) => {
                Some("Lower the weight of another stage first".to_string())
            }
            _ => None,
        }
    }

    /// Whether the error is a user-facing warning rather than a failure
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::MissingProjectDates | Self::InvalidDateRange(..) | Self::NoStages
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(Error::ProjectNotFound("PRJ001".into()).code(), "E001");
        assert_eq!(Error::WeightLimitExceeded(110.0, 100.0).code(), "E101");
        assert_eq!(Error::NoStages.code(), "E202");
        assert_eq!(Error::Other("x".into()).code(), "E9999");
    }

    #[test]
    fn test_weight_limit_message() {
        let err = Error::WeightLimitExceeded(110.0, 100.0);
        assert_eq!(
            err.to_string(),
            "Total stage weight cannot exceed 100% (would be 110%)."
        );
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_schedule_errors_are_warnings() {
        assert!(Error::MissingProjectDates.is_warning());
        assert!(Error::NoStages.is_warning());
        assert!(!Error::ReadOnlyRole("hod".into()).is_warning());
    }
}
