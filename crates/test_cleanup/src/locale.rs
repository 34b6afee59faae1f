//! Interface locale of the test browser session.

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Locale every test starts in.
pub const DEFAULT_LOCALE: &str = "en-GB";

/// Where the harness keeps the locale the administration is shown in.
#[async_trait]
pub trait LocaleStore: Send + Sync {
    async fn set_locale(&self, locale: &str);

    async fn locale(&self) -> Option<String>;
}

/// In-process locale store.
#[derive(Debug, Default)]
pub struct MemoryLocaleStore {
    locale: RwLock<Option<String>>,
}

impl MemoryLocaleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocaleStore for MemoryLocaleStore {
    async fn set_locale(&self, locale: &str) {
        *self.locale.write().await = Some(locale.to_string());
    }

    async fn locale(&self) -> Option<String> {
        self.locale.read().await.clone()
    }
}
