//! # B2B ordering server
//! This crate hosts the HTTP front end of the B2B ordering backend. It is responsible for:
//! * Registering buyers and suppliers, confirming their e-mail addresses and issuing API tokens.
//! * Serving the public catalog of categories, shops and products.
//! * Managing the buyer's basket and placing orders.
//! * Letting suppliers import their YAML price lists, open or close their shop, and fulfil orders.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! `GET /health` is a liveness check. Everything else lives under `/api/v1`; see [routes](routes/index.html).
//! Responses use the `{"Status": bool}` envelope, with `Errors` or `Error` added on failure.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod middleware;
pub mod notifications;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
