//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid evidence message: {0}")]
    InvalidEvidence(String),

    #[error("Invalid decision mode: {0}")]
    InvalidMode(String),

    #[error("Invalid outcome: {0}")]
    InvalidOutcome(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DomainError::InvalidEvidence("expected value at line 1".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid evidence message: expected value at line 1"
        );
    }
}
