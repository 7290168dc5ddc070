//! #  Database management and control.
//!
//! This module defines the interface contracts that database *backends* must honour to power the B2B engine APIs.
//!
//! * [`AccountManagement`] covers registration, account details, delivery contacts and the one-shot tokens used for
//!   e-mail confirmation and password resets.
//! * [`AuthManagement`] covers credential lookup and API tokens.
//! * [`CatalogManagement`] covers supplier price-list imports and the public catalog.
//! * [`BasketManagement`] covers the buyer's basket.
//! * [`OrderManagement`] covers placing orders, order history and supplier fulfilment.
//!
//! Each trait reports failures with the error type of the API that consumes it, so that the APIs can be backed by
//! mocks in tests.
mod account_management;
mod auth_management;
mod basket_management;
mod catalog_management;
mod order_management;

pub use account_management::AccountManagement;
pub use auth_management::AuthManagement;
pub use basket_management::BasketManagement;
pub use catalog_management::CatalogManagement;
pub use order_management::OrderManagement;
