//! Project validation
//!
//! Validates project-related inputs and business rules.

use chrono::NaiveDate;

use crate::application::errors::{AppResult, ApplicationError};
use crate::domain::session::Role;

/// Prefix of sequential project codes
pub const PROJECT_CODE_PREFIX: &str = "PRJ";

/// Validator for project-related operations
pub struct ProjectValidator;

impl ProjectValidator {
    /// Validate a required text field
    ///
    /// Rules:
    /// - Must not be empty or whitespace
    /// - Must be 200 characters or less
    pub fn validate_required(field: &str, value: &str) -> AppResult<()> {
        let value = value.trim();

        if value.is_empty() {
            return Err(ApplicationError::validation(field, format!("{} is required", field)));
        }

        if value.chars().count() > 200 {
            return Err(ApplicationError::validation(
                field,
                format!("{} must be 200 characters or less", field),
            ));
        }

        Ok(())
    }

    /// Validate an optional email address
    ///
    /// Rules:
    /// - Can be empty
    /// - Otherwise must look like `local@domain.tld`
    pub fn validate_email(field: &str, value: &str) -> AppResult<()> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }

        let valid = match value.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !domain.contains('@')
            }
            None => false,
        };

        if !valid {
            return Err(ApplicationError::validation(
                field,
                format!("'{}' is not a valid email address", value),
            ));
        }

        Ok(())
    }

    /// Validate the overall project range
    ///
    /// Rules:
    /// - Either date may be absent
    /// - When both are present, start must not be after end
    pub fn validate_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> AppResult<()> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ApplicationError::validation(
                    "dates",
                    format!("Start date {} is after end date {}", start, end),
                ));
            }
        }
        Ok(())
    }

    /// Validate a project code such as `PRJ007`
    pub fn validate_code(code: &str) -> AppResult<()> {
        match code.strip_prefix(PROJECT_CODE_PREFIX) {
            Some(digits) if digits.len() >= 3 && digits.chars().all(|c| c.is_ascii_digit()) => {
                Ok(())
            }
            _ => Err(ApplicationError::validation(
                "code",
                format!("Invalid project code '{}'. Expected e.g. PRJ001", code),
            )),
        }
    }

    /// Next code after the highest existing one
    pub fn next_code(highest: Option<&str>) -> String {
        let next = highest
            .and_then(|code| code.strip_prefix(PROJECT_CODE_PREFIX))
            .and_then(|digits| digits.parse::<u32>().ok())
            .map_or(1, |n| n + 1);
        format!("{}{:03}", PROJECT_CODE_PREFIX, next)
    }

    /// Check that a role may perform a modifying action
    pub fn ensure_can_modify(role: Role, resource: &str, action: &str) -> AppResult<()> {
        if role.can_edit() {
            Ok(())
        } else {
            Err(ApplicationError::unauthorized(resource, action))
        }
    }
}
