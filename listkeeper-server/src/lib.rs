//! listkeeper-server: persistent named checklists over HTTP
//!
//! A [`Store`] owns the SQLite file and its two tables. A [`ListService`]
//! binds to one list name and performs every item operation and the
//! counter check as a single transaction. The `http` module exposes one
//! list service as a REST API.

pub mod db;
pub mod http;
pub mod models;
pub mod state;

pub use db::{ListService, Store, StoreConfig, StoreError};
pub use http::{build_router, run_server, ApiError, ServeError, ServerConfig};
pub use models::{CheckedUpdate, Item, ItemText, ListName, ManagedList, UpdateCheck};
pub use state::AppState;
