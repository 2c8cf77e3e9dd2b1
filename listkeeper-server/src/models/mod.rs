//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod checked;
pub mod item;
pub mod list;
pub mod validation;

pub use checked::CheckedUpdate;
pub use item::{Item, ItemText};
pub use list::{ListName, ManagedList, UpdateCheck};
pub use validation::ValidationError;
