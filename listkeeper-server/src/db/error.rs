//! Store error type

/// Failures surfaced by the store and list service.
///
/// Absence of a row is never an error here; lookups return `Option`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database could not be opened, read or written (including lock timeouts).
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    /// A row inserted inside a transaction was not visible to that same transaction.
    #[error("inserted {entity} '{key}' could not be read back in the same transaction")]
    InsertionInconsistency { entity: &'static str, key: String },
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}
