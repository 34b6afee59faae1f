//! Shared harness setup for shop E2E tests.
//!
//! [`HarnessContext`] wires the admin session, fixture service, store API and
//! environment reset from a [`HarnessConfig`]. [`naming`] provides unique
//! names for entities the tests create on the shared shop.

mod config;
mod context;
pub mod naming;

pub use config::{ConfigError, HarnessConfig};
pub use context::{HarnessContext, HarnessError};
pub use naming::{ci_context, unique_email, unique_name, unique_product_number};

/// Initialize logging for test runs.
///
/// Reads the filter from `RUST_LOG` and writes through the test writer so
/// output is captured per test. Calling it more than once is harmless.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_test_writer()
        .try_init();
}
