//! Application service layer
//!
//! Input validation and error types for operations that sit between the
//! callers and the domain.

pub mod errors;
pub mod validators;

pub use errors::{AppResult, ApplicationError};
