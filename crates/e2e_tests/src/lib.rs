//! Scenario test support.
//!
//! The scenarios in `tests/` run the whole harness (session, fixtures, store
//! API and reset) against [`MockShop`], an in-memory shop served over HTTP.

pub mod mock_shop;

pub use mock_shop::{MockShop, STOREFRONT_ACCESS_KEY, TOKEN_LIFETIME_SECS};
