//! Managed list records and list names
//!
//! A list name is any non-empty string. Names are compared exactly, so
//! "Shopping List" and "shopping list" are different lists.

use serde::Serialize;
use sqlx::FromRow;

use super::ValidationError;

/// Non-empty list name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListName(String);

impl ListName {
    /// Create a list name. Only the empty string is rejected.
    ///
    /// # Example
    /// ```
    /// use listkeeper_server::models::ListName;
    ///
    /// assert!(ListName::new("shoppingList").is_ok());
    /// assert!(ListName::new("Shopping List").is_ok());
    /// assert!(ListName::new("").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "list name" });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Persisted `ManagedList` row
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ManagedList {
    pub id: i64,
    pub name: String,
    pub counter: i64,
}

/// Outcome of a counter check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateCheck {
    pub counter: i64,
    pub updated: bool,
}
