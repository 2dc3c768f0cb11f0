// Domain error taxonomy
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("could not parse date '{value}': {reason}")]
    DateParse { value: String, reason: String },
    #[error("series '{source_id}' has a mean of zero and cannot be normalized")]
    DivisionByZero { source_id: String },
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("validation failed: {0}")]
    Validation(String),
}

impl AnalysisError {
    pub fn date_parse(value: &str, reason: impl ToString) -> Self {
        Self::DateParse {
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// A failure scoped to one input item; siblings are still computed.
#[derive(Debug, Clone, Serialize)]
pub struct ItemFailure {
    pub id: String,
    pub message: String,
}

impl ItemFailure {
    pub fn new(id: &str, error: &AnalysisError) -> Self {
        Self {
            id: id.to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::date_parse("2024-13-01", "input is out of range");
        assert_eq!(
            err.to_string(),
            "could not parse date '2024-13-01': input is out of range"
        );

        let err = AnalysisError::not_found("livestock", "42");
        assert_eq!(err.to_string(), "livestock '42' not found");

        let failure = ItemFailure::new("evt-1", &err);
        assert_eq!(failure.id, "evt-1");
        assert_eq!(failure.message, "livestock '42' not found");
    }
}
