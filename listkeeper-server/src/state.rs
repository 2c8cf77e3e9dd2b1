//! Application state shared across handlers

use crate::db::{ListService, Store};

/// Shared application state
#[derive(Debug)]
pub struct AppState {
    pub store: Store,
    /// The list every `/api` route operates on
    pub list: ListService,
}

impl AppState {
    pub fn new(store: Store, list: ListService) -> Self {
        Self { store, list }
    }
}
