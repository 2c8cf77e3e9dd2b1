//! Store and list selection shared by every subcommand

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use listkeeper_server::{ListName, ListService, Store};

/// Default database location, relative to the working directory
pub const DEFAULT_DB_PATH: &str = "data/shopping_list/sqlite.db";

/// Default list served and edited by the CLI
pub const DEFAULT_LIST: &str = "shoppingList";

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// SQLite database file (created if absent)
    #[arg(long, global = true, env = "LISTKEEPER_DB", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Name of the managed list to operate on
    #[arg(long, global = true, env = "LISTKEEPER_LIST", default_value = DEFAULT_LIST)]
    pub list: String,
}

impl ListArgs {
    /// Open the store, creating its directory, and bind the list service.
    pub async fn open(&self) -> Result<(Store, ListService)> {
        let name = ListName::new(&self.list)
            .with_context(|| format!("Invalid list name '{}'", self.list))?;

        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let store = Store::open(&self.db_path)
            .await
            .with_context(|| format!("Failed to open store at {}", self.db_path.display()))?;

        let list = ListService::open(&store, &name)
            .await
            .with_context(|| format!("Failed to load list '{}'", self.list))?;

        Ok((store, list))
    }
}
