use thiserror::Error;

/// Field-level validation failure raised at the request boundary, before any
/// database call happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("field `{field}` is required")]
    Missing { field: &'static str },

    #[error("field `{field}`: expected {expected}")]
    Type {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `{field}`: {message}")]
    Range {
        field: &'static str,
        message: String,
    },

    #[error("field `{field}`: {message}")]
    Format {
        field: &'static str,
        message: String,
    },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field }
            | ValidationError::Type { field, .. }
            | ValidationError::Range { field, .. }
            | ValidationError::Format { field, .. } => field,
        }
    }
}
