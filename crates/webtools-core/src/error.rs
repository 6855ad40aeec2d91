use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification shared by every tool, used by front ends to decide
/// how to surface a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The caller supplied something unusable; fix the input and retry.
    Validation,
    /// A remote service could not be reached or answered badly.
    Network,
    /// The input was well-formed but the computation itself failed.
    Processing,
}

#[derive(Debug, Error)]
pub enum WebToolsError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Could not parse {input:?} at position {position}: {reason}")]
    Parse {
        input: String,
        position: usize,
        reason: String,
    },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl WebToolsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WebToolsError::InvalidInput { .. }
            | WebToolsError::Parse { .. }
            | WebToolsError::FinancialImpossibility(_) => ErrorKind::Validation,
            WebToolsError::Network(_) => ErrorKind::Network,
            WebToolsError::ConvergenceFailure { .. }
            | WebToolsError::DivisionByZero { .. }
            | WebToolsError::Serialization(_) => ErrorKind::Processing,
        }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        WebToolsError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for WebToolsError {
    fn from(e: serde_json::Error) -> Self {
        WebToolsError::Serialization(e.to_string())
    }
}

#[cfg(feature = "live_rates")]
impl From<reqwest::Error> for WebToolsError {
    fn from(e: reqwest::Error) -> Self {
        WebToolsError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_taxonomy() {
        assert_eq!(
            WebToolsError::invalid("principal", "must be positive").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            WebToolsError::Network("timeout".into()).kind(),
            ErrorKind::Network
        );
        assert_eq!(
            WebToolsError::DivisionByZero {
                context: "calc".into()
            }
            .kind(),
            ErrorKind::Processing
        );
    }

    #[test]
    fn test_display_includes_field() {
        let e = WebToolsError::invalid("term_years", "must be at least 1");
        assert_eq!(
            e.to_string(),
            "Invalid input: term_years — must be at least 1"
        );
    }
}
