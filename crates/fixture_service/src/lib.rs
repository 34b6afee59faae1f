//! Test fixtures created through the shop's admin and store APIs.
//!
//! [`FixtureService`] is the single entry point for admin-side test data. It
//! authenticates every request through an injected
//! [`auth_handler::SessionAuthenticator`], starts each entity from a named
//! default dataset ([`DefaultDatasets`]) and resolves foreign keys by looking
//! up baseline entities by name before creating anything.
//!
//! Entity-specific recipes (products, customers, orders, ...) live in
//! [`fixtures`] as free functions. Storefront visitors are driven through
//! [`StoreApi`].
//!
//! Every failure is returned to the caller unchanged. Nothing here retries and
//! nothing cleans up partially created fixtures.

mod defaults;
mod errors;
pub mod fixtures;
pub mod merge;
mod request;
mod service;
mod storefront;

#[cfg(test)]
mod test_support;

pub use api_client::{ResolvedEntity, SearchFilter};
pub use defaults::DefaultDatasets;
pub use errors::{FixtureError, FixtureResult};
pub use merge::{merge, merge_all};
pub use request::{DependencyRef, FixtureRequest};
pub use service::FixtureService;
pub use storefront::{CustomerCredentials, StoreApi};
