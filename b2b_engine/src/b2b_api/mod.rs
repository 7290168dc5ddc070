//! # B2B engine public API
//!
//! The `b2b_api` module exposes the programmatic API for the ordering engine.
//! The API is modular, so that clients of the API can pick and choose the functionality they want.
//!
//! * [`accounts_api`] handles registration, e-mail confirmation, account details, contacts and password resets.
//! * [`auth_api`] exchanges credentials for API tokens and resolves tokens back to users.
//! * [`catalog_api`] imports supplier price lists and serves the public catalog.
//! * [`basket_api`] manages the buyer's basket.
//! * [`order_flow_api`] places orders and lets suppliers move them through fulfilment.
//!
//! # API usage
//!
//! The pattern for using all the APIs is the same. An API instance is created by supplying a database backend that
//! implements the specific backend traits required by the API.
//!
//! ```rust,ignore
//! use b2b_engine::{BasketApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements BasketManagement
//! let api = BasketApi::new(db);
//! let baskets = api.basket(user_id).await?;
//! ```

pub mod account_objects;
pub mod accounts_api;
pub mod auth_api;
pub mod basket_api;
pub mod catalog_api;
pub mod catalog_objects;
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
