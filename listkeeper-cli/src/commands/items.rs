//! Item commands - inspect and edit a list without the server

use anyhow::{Context, Result};
use clap::Parser;

use listkeeper_server::ItemText;

use crate::config::ListArgs;

#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Text of the new item
    pub text: String,

    /// Add the item already checked
    #[arg(long)]
    pub checked: bool,
}

/// Print every item of the list as a JSON array
pub async fn run_items(list_args: &ListArgs) -> Result<()> {
    let (_store, list) = list_args.open().await?;
    let items = list.reload().await.context("Failed to fetch items")?;

    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

/// Add an item and print it as JSON
pub async fn run_add(list_args: &ListArgs, args: AddArgs) -> Result<()> {
    let text = ItemText::new(args.text).context("Item text cannot be empty")?;

    let (_store, list) = list_args.open().await?;
    let item = list
        .add_item(&text, args.checked)
        .await
        .context("Failed to add item")?;

    println!("{}", serde_json::to_string_pretty(&item)?);
    Ok(())
}
