//! B2B Ordering Engine
//!
//! The engine holds the core logic of the B2B ordering service: suppliers publish their catalogs as price lists, and
//! buyers collect SKUs from any number of suppliers into a basket and place it as an order. It is transport-agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@db`]). SQLite is the supported backend. You should never need to access
//!    the database directly. Instead, use the public API provided by the engine. The exception is the data types used
//!    in the database. These are defined in the `db_types` module and are public.
//! 2. The engine public API ([`mod@b2b_api`]). This provides the public-facing functionality of the engine: accounts,
//!    authentication, the catalog, the basket and the order flow. Backends need to implement the traits in
//!    [`traits`] in order to back these APIs.
//!
//! The engine also emits events when certain actions occur, e.g. an [`events::OrderPlacedEvent`] when a basket is
//! placed. A simple actor framework lets you hook into these events, which is how order notifications get sent
//! without holding up the request that triggered them.
mod db;

mod b2b_api;
pub mod db_types;
pub mod events;
pub mod feed;
pub mod helpers;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use b2b_api::{
    account_objects,
    accounts_api::AccountApi,
    auth_api::AuthApi,
    basket_api::BasketApi,
    catalog_api::CatalogApi,
    catalog_objects,
    errors::{AccountApiError, AuthApiError, BasketApiError, CatalogApiError, OrderFlowApiError},
    order_flow_api::OrderFlowApi,
    order_objects,
};
#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use db::traits;
