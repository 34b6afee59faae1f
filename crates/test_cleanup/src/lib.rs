//! Environment reset for the shop E2E harness.
//!
//! Before every test the harness puts the shop back into a known state:
//! the database is restored from its baseline snapshot, the shop cache is
//! cleared and the interface locale is reset. [`EnvironmentReset`] runs those
//! steps and never fails; problems are logged and the test goes on.
//!
//! The snapshot is restored either by running the shop console locally
//! ([`LocalConsoleRestorer`]) or by asking the cleanup server on the shop host
//! ([`CleanupServerRestorer`]). The cleanup server itself lives in [`server`]
//! and ships as the `cleanup-server` binary.

pub mod command;
pub mod locale;
pub mod reset;
pub mod restore;
pub mod server;

pub use command::{CommandError, ShellCommand};
pub use locale::{DEFAULT_LOCALE, LocaleStore, MemoryLocaleStore};
pub use reset::{CacheControl, EnvironmentReset};
pub use restore::{
    BaselineRestorer, CLEANUP_SUCCESS, CleanupServerRestorer, DEFAULT_CLEANUP_PORT,
    LocalConsoleRestorer, RestoreError,
};
pub use server::{CleanupServer, CleanupServerConfig};

/// Initialize logging for cleanup operations.
///
/// Reads the filter from `RUST_LOG`.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();
}
