//! Cleanup server
//!
//! A small HTTP server running next to the shop. `GET /cleanup` runs the
//! project's restore script and answers `success` or the failure report.
//! Every other path answers with an empty page. All answers are `200` with
//! an HTML content type so browser-based test runners can call it directly.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::response::Html;
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::command::ShellCommand;
use crate::restore::{CLEANUP_SUCCESS, DEFAULT_CLEANUP_PORT};

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;

/// Cleanup server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Absolute path of the project holding `psh.phar`
    pub project_root: PathBuf,
}

impl Default for CleanupServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_CLEANUP_PORT,
            host: "0.0.0.0".to_string(),
            project_root: PathBuf::from("."),
        }
    }
}

impl CleanupServerConfig {
    /// Reads `CLEANUP_PORT`, `CLEANUP_HOST` and `PROJECT_ROOT`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// A relative `PROJECT_ROOT` is resolved against the working directory.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match lookup("CLEANUP_PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("Invalid CLEANUP_PORT '{}'", port))?,
            None => defaults.port,
        };
        let host = lookup("CLEANUP_HOST").unwrap_or(defaults.host);
        let project_root = lookup("PROJECT_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.project_root);

        Ok(Self {
            port,
            host,
            project_root: absolute(&project_root)?,
        })
    }
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    Ok(cwd.join(path))
}

/// Builds the router around the command run on `/cleanup`.
pub fn router(command: Arc<ShellCommand>) -> Router {
    Router::new()
        .route("/cleanup", any(cleanup))
        .fallback(empty)
        .with_state(command)
        .layer(TraceLayer::new_for_http())
}

async fn cleanup(State(command): State<Arc<ShellCommand>>) -> Html<String> {
    match command.run().await {
        Ok(_) => {
            info!("Cleanup finished");
            Html(CLEANUP_SUCCESS.to_string())
        }
        Err(e) => {
            error!(error = %e, "Cleanup failed");
            Html(e.report())
        }
    }
}

async fn empty() -> Html<&'static str> {
    Html("")
}

/// Cleanup server
pub struct CleanupServer {
    config: CleanupServerConfig,
    command: Arc<ShellCommand>,
}

impl CleanupServer {
    pub fn new(config: CleanupServerConfig) -> Self {
        let command = Arc::new(ShellCommand::psh_cleanup(&config.project_root));
        Self { config, command }
    }

    pub fn config(&self) -> &CleanupServerConfig {
        &self.config
    }

    pub fn router(&self) -> Router {
        router(self.command.clone())
    }

    /// Listens until CTRL+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address cannot be bound.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = SocketAddr::from((
            self.config
                .host
                .parse::<std::net::IpAddr>()
                .with_context(|| format!("Invalid host '{}'", self.config.host))?,
            self.config.port,
        ));

        info!(
            %addr,
            command = %self.command.display(),
            "Starting cleanup server"
        );

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Cleanup server error")?;

        info!("Cleanup server stopped");

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received CTRL+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
