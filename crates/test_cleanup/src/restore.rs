//! Restoring the shop database to its baseline snapshot.

use std::path::PathBuf;

use api_client::{ApiClient, ApiConfig, HttpError, HttpMethod};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};
use url::Url;

use crate::command::{CommandError, ShellCommand};

#[cfg(test)]
#[path = "restore_tests.rs"]
mod tests;

/// Port the cleanup server listens on unless configured otherwise.
pub const DEFAULT_CLEANUP_PORT: u16 = 8005;

/// Body the cleanup server answers with once the snapshot is restored.
pub const CLEANUP_SUCCESS: &str = "success";

/// Errors from a baseline restore.
#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    #[error(transparent)]
    Request(#[from] HttpError),

    #[error("Cleanup server did not confirm the restore: {body}")]
    Rejected { body: String },

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Invalid cleanup server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Puts the shop database back to its baseline snapshot.
#[async_trait]
pub trait BaselineRestorer: Send + Sync {
    async fn restore(&self) -> Result<(), RestoreError>;
}

/// Restores through the cleanup server running next to the shop.
#[derive(Debug, Clone)]
pub struct CleanupServerRestorer {
    client: ApiClient,
}

impl CleanupServerRestorer {
    /// Targets the cleanup server on the same host as `shop_url`.
    ///
    /// The cleanup server only speaks plain HTTP, whatever the shop's scheme.
    ///
    /// # Errors
    /// `RestoreError::InvalidUrl` if `shop_url` has no host.
    pub fn new(shop_url: &str, port: u16) -> Result<Self, RestoreError> {
        let url = Url::parse(shop_url).map_err(|e| RestoreError::InvalidUrl {
            url: shop_url.to_string(),
            reason: e.to_string(),
        })?;
        let host = url.host_str().ok_or_else(|| RestoreError::InvalidUrl {
            url: shop_url.to_string(),
            reason: "missing host".to_string(),
        })?;

        Self::with_server_url(&format!("http://{}:{}", host, port))
    }

    /// Targets a cleanup server at an explicit URL.
    pub fn with_server_url(server_url: &str) -> Result<Self, RestoreError> {
        let client = ApiClient::new(&ApiConfig::admin(server_url).with_api_path(""))?;
        Ok(Self { client })
    }

    pub fn server_url(&self) -> &Url {
        self.client.base_url()
    }
}

#[async_trait]
impl BaselineRestorer for CleanupServerRestorer {
    #[instrument(skip(self), fields(server = %self.client.base_url()))]
    async fn restore(&self) -> Result<(), RestoreError> {
        let response = self
            .client
            .request(HttpMethod::Get, "/cleanup", None, None)
            .await?;

        match &response.body {
            Value::String(body) if body.trim() == CLEANUP_SUCCESS => {
                info!("Baseline restored by cleanup server");
                Ok(())
            }
            Value::String(body) => Err(RestoreError::Rejected { body: body.clone() }),
            other => Err(RestoreError::Rejected {
                body: other.to_string(),
            }),
        }
    }
}

/// Restores by running the shop's console directly.
#[derive(Debug, Clone)]
pub struct LocalConsoleRestorer {
    shopware_root: PathBuf,
    command: ShellCommand,
}

impl LocalConsoleRestorer {
    pub fn new(shopware_root: impl Into<PathBuf>) -> Self {
        let shopware_root = shopware_root.into();
        let command = ShellCommand::console_restore(&shopware_root);
        Self {
            shopware_root,
            command,
        }
    }

    pub fn shopware_root(&self) -> &std::path::Path {
        &self.shopware_root
    }

    pub fn command(&self) -> &ShellCommand {
        &self.command
    }
}

#[async_trait]
impl BaselineRestorer for LocalConsoleRestorer {
    #[instrument(skip(self), fields(root = %self.shopware_root.display()))]
    async fn restore(&self) -> Result<(), RestoreError> {
        self.command.run().await?;
        info!("Baseline restored from local console");
        Ok(())
    }
}
