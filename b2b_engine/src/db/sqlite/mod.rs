pub mod db;
mod errors;

pub mod auth;
pub mod baskets;
pub mod catalog;
pub mod contacts;
pub mod orders;
pub mod users;

use std::str::FromStr;

pub use db::SqliteDatabase;
pub use errors::SqliteDatabaseError;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

/// Opens a connection pool. Foreign keys are enforced on every connection, since catalog re-imports rely on
/// `ON DELETE` actions.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqliteDatabaseError> {
    let options = SqliteConnectOptions::from_str(url)?.foreign_keys(true).create_if_missing(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}
