//! Database layer - SQLite store and the list service
//!
//! # Design Principles
//!
//! - One pooled handle shared by every request; SQLite serializes writers
//! - Multi-step writes run through `tx::in_transaction`
//! - Rely on DB constraints, handle conflicts - no check-then-insert races

pub mod error;
pub mod lists;
pub mod store;
pub mod tx;

pub use error::StoreError;
pub use lists::ListService;
pub use store::{Store, StoreConfig};
pub use tx::in_transaction;
