// src/error.rs
use thiserror::Error;

/// Error types for the gbm-risk engine and its request boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// A request field outside its declared range
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameter {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Malformed request body at the boundary
    #[error("Malformed request: {reason}")]
    MalformedRequest { reason: String },

    /// Unexpected internal fault during simulation or aggregation
    #[error("Computation failure: {reason}")]
    ComputationFailure { reason: String },
}

impl RiskError {
    /// Status code the boundary layer reports for this error
    pub fn status_code(&self) -> u16 {
        match self {
            RiskError::InvalidParameter { .. } | RiskError::MalformedRequest { .. } => 400,
            RiskError::ComputationFailure { .. } => 500,
        }
    }

    /// Message safe to show to the caller.
    ///
    /// Internal failures are reported generically; their detail goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            RiskError::ComputationFailure { .. } => "Error processing the simulation".to_string(),
            other => other.to_string(),
        }
    }

    pub(crate) fn computation(reason: impl Into<String>) -> Self {
        RiskError::ComputationFailure {
            reason: reason.into(),
        }
    }
}

/// Result type alias for gbm-risk operations
pub type RiskResult<T> = Result<T, RiskError>;

/// Validation utilities
pub mod validation {
    use super::{RiskError, RiskResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> RiskResult<()> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(RiskError::InvalidParameter {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        }
    }

    /// Validate that a parameter is within a closed range
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> RiskResult<()> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(RiskError::InvalidParameter {
                parameter: name.to_string(),
                value,
                constraint: format!("must be in range [{}, {}]", min, max),
            })
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> RiskResult<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(RiskError::InvalidParameter {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        }
    }

    /// Validate an integer count against a closed range
    pub fn validate_count_range(name: &str, count: usize, min: usize, max: usize) -> RiskResult<()> {
        if (min..=max).contains(&count) {
            Ok(())
        } else {
            Err(RiskError::InvalidParameter {
                parameter: name.to_string(),
                value: count as f64,
                constraint: format!("must be between {} and {}", min, max),
            })
        }
    }
}
