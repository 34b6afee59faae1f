//! Returning the shop to a known state between tests.

use std::sync::Arc;

use async_trait::async_trait;
use fixture_service::{FixtureResult, FixtureService};
use tracing::{error, info, instrument, warn};

use crate::locale::{DEFAULT_LOCALE, LocaleStore};
use crate::restore::BaselineRestorer;

#[cfg(test)]
#[path = "reset_tests.rs"]
mod tests;

/// Invalidates the shop's HTTP and object caches.
#[async_trait]
pub trait CacheControl: Send + Sync {
    async fn clear_cache(&self) -> FixtureResult<()>;
}

#[async_trait]
impl CacheControl for FixtureService {
    async fn clear_cache(&self) -> FixtureResult<()> {
        FixtureService::clear_cache(self).await
    }
}

/// Runs the three reset steps before each test.
///
/// 1. Restore the baseline database snapshot.
/// 2. Clear the shop cache.
/// 3. Put the interface locale back to the baseline locale.
///
/// A failing step is logged and the remaining steps still run, so a reset
/// never fails the test that requested it.
pub struct EnvironmentReset {
    restorer: Arc<dyn BaselineRestorer>,
    cache: Arc<dyn CacheControl>,
    locales: Arc<dyn LocaleStore>,
    baseline_locale: String,
}

impl EnvironmentReset {
    pub fn new(
        restorer: Arc<dyn BaselineRestorer>,
        cache: Arc<dyn CacheControl>,
        locales: Arc<dyn LocaleStore>,
    ) -> Self {
        Self {
            restorer,
            cache,
            locales,
            baseline_locale: DEFAULT_LOCALE.to_string(),
        }
    }

    pub fn with_baseline_locale(mut self, locale: impl Into<String>) -> Self {
        self.baseline_locale = locale.into();
        self
    }

    pub fn baseline_locale(&self) -> &str {
        &self.baseline_locale
    }

    /// Resets the environment. Safe to call any number of times.
    #[instrument(skip(self))]
    pub async fn reset_environment(&self) {
        if let Err(e) = self.restorer.restore().await {
            error!(error = %e, "Baseline restore failed, tests may see leftover data");
        }

        if let Err(e) = self.cache.clear_cache().await {
            warn!(error = %e, "Clearing the shop cache failed");
        }

        self.locales.set_locale(&self.baseline_locale).await;

        info!(locale = %self.baseline_locale, "Environment reset");
    }
}

impl std::fmt::Debug for EnvironmentReset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentReset")
            .field("baseline_locale", &self.baseline_locale)
            .finish_non_exhaustive()
    }
}
