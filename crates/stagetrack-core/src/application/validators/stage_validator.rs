//! Stage validation
//!
//! Validates stage weights and names before a snapshot is saved. The
//! allocator itself never enforces these rules.

use crate::application::errors::{AppResult, ApplicationError};
use crate::domain::project::Stage;

/// Validator for stage-related inputs
pub struct StageValidator;

impl StageValidator {
    /// Validate a single weight
    ///
    /// Rules:
    /// - Must be a finite number
    /// - Must not be negative
    /// - Must not exceed the ceiling on its own
    pub fn validate_weight(weight: f64, max_total: f64) -> AppResult<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ApplicationError::validation(
                "weight",
                format!("Weight must be a non-negative number, got {}", weight),
            ));
        }

        if weight > max_total {
            return Err(ApplicationError::validation(
                "weight",
                format!("Weight cannot exceed {}%", max_total),
            ));
        }

        Ok(())
    }

    /// Parse a weight typed by a user ("25", "25%", " 12.5 % ")
    pub fn parse_weight(input: &str) -> AppResult<f64> {
        let trimmed = input.trim().trim_end_matches('%').trim();
        trimmed.parse::<f64>().map_err(|_| {
            ApplicationError::validation("weight", format!("'{}' is not a number", input))
        })
    }

    /// Validate the weights of a whole stage list
    ///
    /// Rules:
    /// - Every weight must be valid
    /// - The total must not exceed the ceiling
    pub fn validate_weights(stages: &[Stage], max_total: f64) -> AppResult<()> {
        for stage in stages {
            Self::validate_weight(stage.weight, max_total).map_err(|_| {
                ApplicationError::validation(
                    "weight",
                    format!("Stage '{}' has an invalid weight {}", stage.name, stage.weight),
                )
            })?;
        }

        let total: f64 = stages.iter().map(|s| s.weight).sum();
        if total > max_total + 1e-9 {
            return Err(ApplicationError::validation(
                "weight",
                format!("Total stage weight cannot exceed {}% (got {}%)", max_total, total),
            ));
        }

        Ok(())
    }

    /// Validate a stage name
    ///
    /// Rules:
    /// - Must not be empty
    /// - Must be 100 characters or less
    pub fn validate_name(name: &str) -> AppResult<()> {
        let name = name.trim();

        if name.is_empty() {
            return Err(ApplicationError::validation("stage", "Stage name cannot be empty"));
        }

        if name.chars().count() > 100 {
            return Err(ApplicationError::validation(
                "stage",
                "Stage name must be 100 characters or less",
            ));
        }

        Ok(())
    }

    /// Names that occur more than once.
    ///
    /// Stages are matched by name when diffing, so duplicates make later
    /// stages invisible to the audit trail.
    pub fn duplicate_names(stages: &[Stage]) -> Vec<String> {
        let mut duplicates: Vec<String> = Vec::new();
        for (i, stage) in stages.iter().enumerate() {
            let repeated = stages[..i].iter().any(|s| s.name == stage.name);
            if repeated && !duplicates.contains(&stage.name) {
                duplicates.push(stage.name.clone());
            }
        }
        duplicates
    }
}
