//! listkeeper CLI - persistent named checklists
//!
//! - `serve`: run the REST API for one list
//! - `items`: print a list's items as JSON
//! - `add`: add an item from the command line

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use config::ListArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "listkeeper",
    author,
    version,
    about = "Persistent named checklists with a polling-friendly REST API"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(flatten)]
    list: ListArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the list over HTTP
    Serve(commands::ServeArgs),
    /// Print all items of the list as JSON
    Items,
    /// Add an item to the list
    Add(commands::AddArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(&cli.list, args).await?,
        Commands::Items => commands::run_items(&cli.list).await?,
        Commands::Add(args) => commands::run_add(&cli.list, args).await?,
    }

    Ok(())
}
