//! Tri-state `checked` flag for item updates

use serde_json::Value as JsonValue;

use super::ValidationError;

/// How an update treats an item's `checked` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckedUpdate {
    /// Leave the stored flag untouched, update text only
    #[default]
    Unchanged,
    /// Overwrite the stored flag
    Set(bool),
}

impl CheckedUpdate {
    /// Read a `checked` field the way the web client sends it.
    ///
    /// `null`/absent and the string `"null"` leave the flag alone; `"false"`
    /// and `0` clear it; any other string or number sets it.
    pub fn from_json(value: Option<&JsonValue>) -> Result<Self, ValidationError> {
        match value {
            None | Some(JsonValue::Null) => Ok(Self::Unchanged),
            Some(JsonValue::Bool(b)) => Ok(Self::Set(*b)),
            Some(JsonValue::String(s)) => match s.to_lowercase().as_str() {
                "null" => Ok(Self::Unchanged),
                "false" => Ok(Self::Set(false)),
                _ => Ok(Self::Set(true)),
            },
            Some(JsonValue::Number(n)) => Ok(Self::Set(n.as_f64() != Some(0.0))),
            Some(JsonValue::Array(_)) => Err(ValidationError::InvalidType {
                field: "checked",
                found: "array",
            }),
            Some(JsonValue::Object(_)) => Err(ValidationError::InvalidType {
                field: "checked",
                found: "object",
            }),
        }
    }

    /// The flag to store for a brand-new item.
    pub fn or_unchecked(self) -> bool {
        match self {
            Self::Unchanged => false,
            Self::Set(b) => b,
        }
    }
}

impl From<Option<bool>> for CheckedUpdate {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Unchanged, Self::Set)
    }
}
