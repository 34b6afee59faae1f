//! Per-worker harness wiring.

use std::sync::Arc;

use api_client::{ApiClient, HttpError};
use auth_handler::AdminSession;
use fixture_service::{DefaultDatasets, FixtureError, FixtureService, StoreApi};
use test_cleanup::{
    BaselineRestorer, CleanupServerRestorer, EnvironmentReset, LocalConsoleRestorer,
    MemoryLocaleStore, RestoreError,
};
use tracing::{debug, info};

use crate::config::{ConfigError, HarnessConfig};

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

/// Errors from assembling a [`HarnessContext`].
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Restore(#[from] RestoreError),
}

/// Everything one test worker needs: the admin session, the fixture service,
/// store API access and the environment reset.
///
/// Build one per worker; nothing in here is process-global.
pub struct HarnessContext {
    config: HarnessConfig,
    session: Arc<AdminSession>,
    fixtures: Arc<FixtureService>,
    store_client: ApiClient,
    locales: Arc<MemoryLocaleStore>,
    reset: EnvironmentReset,
}

impl HarnessContext {
    /// Wires the harness for `config`.
    ///
    /// No request is sent; the admin token is fetched on first use.
    pub fn new(config: HarnessConfig) -> Result<Self, HarnessError> {
        let admin_client = ApiClient::new(&config.admin_api())?;
        let store_client = ApiClient::new(&config.store_api())?;

        let session = Arc::new(AdminSession::new(admin_client.clone(), config.auth()));

        let defaults = match &config.fixtures_dir {
            Some(dir) => DefaultDatasets::from_dir(dir)?,
            None => DefaultDatasets::builtin()?,
        };
        let fixtures = Arc::new(FixtureService::new(
            admin_client,
            session.clone(),
            defaults,
        ));

        let restorer: Arc<dyn BaselineRestorer> = if config.local_usage {
            debug!(root = %config.shopware_root.display(), "Restoring through local console");
            Arc::new(LocalConsoleRestorer::new(&config.shopware_root))
        } else {
            debug!(port = config.cleanup_port, "Restoring through cleanup server");
            Arc::new(CleanupServerRestorer::new(
                &config.base_url,
                config.cleanup_port,
            )?)
        };

        let locales = Arc::new(MemoryLocaleStore::new());
        let reset = EnvironmentReset::new(restorer, fixtures.clone(), locales.clone())
            .with_baseline_locale(&config.locale);

        info!(base_url = %config.base_url, "Harness context ready");

        Ok(Self {
            config,
            session,
            fixtures,
            store_client,
            locales,
            reset,
        })
    }

    /// Wires the harness from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = HarnessConfig::from_env()?;
        Ok(Self::new(config)?)
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<AdminSession> {
        &self.session
    }

    pub fn fixtures(&self) -> &FixtureService {
        &self.fixtures
    }

    pub fn locales(&self) -> &Arc<MemoryLocaleStore> {
        &self.locales
    }

    /// A fresh storefront visitor for the configured sales channel.
    pub fn store_api(&self) -> StoreApi {
        StoreApi::new(self.store_client.clone()).with_sales_channel(&self.config.sales_channel_name)
    }

    /// Puts the shop back into its baseline state. Never fails.
    pub async fn reset_environment(&self) {
        self.reset.reset_environment().await;
    }
}

impl std::fmt::Debug for HarnessContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessContext")
            .field("config", &self.config)
            .field("reset", &self.reset)
            .finish_non_exhaustive()
    }
}
