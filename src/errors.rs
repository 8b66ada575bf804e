use thiserror::Error;

/// Error type that captures engine and entity failures.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("Invalid `{field}`: {reason}")]
    Validation { field: String, reason: String },
    #[error("Target must be greater than zero (got {0})")]
    InvalidTarget(f64),
    #[error("Unknown field `{field}` for {entity}")]
    UnknownField { entity: String, field: String },
    #[error("{entity} `{id}` not found")]
    NotFound { entity: String, id: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl FinanceError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FinanceError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        FinanceError::UnknownField {
            entity: entity.into(),
            field: field.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        FinanceError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// The field named by a validation failure or an unknown-field lookup.
    pub fn field(&self) -> Option<&str> {
        match self {
            FinanceError::Validation { field, .. } => Some(field),
            FinanceError::UnknownField { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type FinanceResult<T> = Result<T, FinanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_field() {
        let err = FinanceError::validation("amount", "must be a number");
        assert_eq!(err.field(), Some("amount"));
        assert_eq!(err.to_string(), "Invalid `amount`: must be a number");
    }

    #[test]
    fn not_found_has_no_field() {
        let err = FinanceError::not_found("Goal", "g-1");
        assert!(err.field().is_none());
        assert!(err.to_string().contains("g-1"));
    }

    #[test]
    fn unknown_field_reports_the_field() {
        let err = FinanceError::unknown_field("sort", "color");
        assert_eq!(err.field(), Some("color"));
    }
}
