//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (verbosity levels ≥ 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Config → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::Config;
use crate::transport::wrapper::{check_level, WrapperError};

/// A single semantic problem in the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("logging: {0}")]
    Logging(WrapperError),

    #[error("transport: {0}")]
    Transport(WrapperError),
}

/// Check every field, collecting all problems.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = check_level("log", config.logging.v) {
        errors.push(ValidationError::Logging(e));
    }
    if let Err(e) = check_level("header", config.transport.header_v) {
        errors.push(ValidationError::Transport(e));
    }
    if let Err(e) = check_level("body", config.transport.body_v) {
        errors.push(ValidationError::Transport(e));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
