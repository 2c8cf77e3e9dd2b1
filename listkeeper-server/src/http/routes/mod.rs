//! Route handlers organized by resource

pub mod check;
pub mod health;
pub mod items;
