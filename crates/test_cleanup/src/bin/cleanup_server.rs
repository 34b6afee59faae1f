//! Cleanup server for E2E runs against a shared shop.
//!
//! # Environment Variables
//!
//! - `CLEANUP_PORT`: Port to listen on (default: 8005)
//! - `CLEANUP_HOST`: Host to bind to (default: 0.0.0.0)
//! - `PROJECT_ROOT`: Project holding `psh.phar` (default: working directory)
//! - `RUST_LOG`: Log filter

use test_cleanup::{CleanupServer, CleanupServerConfig, init_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = CleanupServerConfig::from_env()?;
    tracing::info!(
        project_root = %config.project_root.display(),
        "Loaded cleanup server configuration"
    );

    CleanupServer::new(config).serve().await
}
