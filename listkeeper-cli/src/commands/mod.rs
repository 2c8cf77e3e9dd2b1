//! Command implementations for listkeeper CLI

pub mod items;
pub mod serve;

// Re-export main dispatcher functions for flat access from main.rs
pub use items::{run_add, run_items, AddArgs};
pub use serve::{run_serve, ServeArgs};
