//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is missing or empty when it shouldn't be
    Empty { field: &'static str },

    /// JSON value has a type the field cannot be read from
    InvalidType { field: &'static str, found: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} is required", field),
            Self::InvalidType { field, found } => {
                write!(f, "'{}' must not be of type {}", field, found)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            ValidationError::Empty { field: "Text" }.to_string(),
            "Text is required"
        );
        assert_eq!(
            ValidationError::InvalidType {
                field: "checked",
                found: "array"
            }
            .to_string(),
            "'checked' must not be of type array"
        );
    }
}
