//! Checklist items

use serde::Serialize;
use sqlx::FromRow;

use super::ValidationError;

/// Non-empty item text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemText(String);

impl ItemText {
    /// Whitespace is kept as-is; only the empty string is rejected.
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "Text" });
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Persisted `Item` row
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Item {
    pub id: i64,
    pub text: String,
    pub checked: bool,
    #[sqlx(rename = "managedList")]
    #[serde(rename = "managedList")]
    pub managed_list: i64,
}
