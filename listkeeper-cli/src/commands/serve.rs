//! HTTP server command
//!
//! Serves one managed list over the REST API.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use listkeeper_server::{run_server, AppState, ServerConfig};

use crate::config::ListArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Path prefix the list API is mounted under
    #[arg(long, default_value = "/shopping-list")]
    pub mount: String,

    /// Directory of static files served for unmatched paths; the list page is
    /// read from its subdirectory named after the mount path
    #[arg(long, env = "LISTKEEPER_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.bind, self.port),
            cors_permissive: self.cors_permissive,
            mount_path: self.mount.clone(),
            static_dir: self.static_dir.clone(),
            request_timeout: Duration::from_secs(self.timeout),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(list_args: &ListArgs, args: ServeArgs) -> Result<()> {
    let (store, list) = list_args.open().await?;
    tracing::info!(
        db = %store.path().display(),
        list = %list.name(),
        "Starting listkeeper server on {}:{}",
        args.bind,
        args.port
    );

    let config = args.server_config();

    // Run server (blocks until shutdown)
    run_server(AppState::new(store, list), config)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_server_config() {
        let args = ServeArgs::parse_from(["serve", "--port", "8080", "--mount", "/groceries"]);
        let config = args.server_config();

        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(config.mount_path, "/groceries");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.static_dir.is_none());
    }
}
