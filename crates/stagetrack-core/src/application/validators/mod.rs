//! Application validators
//!
//! Input validation for application operations.

pub mod project_validator;
pub mod stage_validator;

pub use project_validator::ProjectValidator;
pub use stage_validator::StageValidator;
