use log::error;
use thiserror::Error;

use crate::{AccountApiError, AuthApiError, BasketApiError, CatalogApiError, OrderFlowApiError};

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(sqlx::Error),
    /// A unique, foreign-key or check constraint was violated. Holds the database's own message.
    #[error("{0}")]
    IntegrityError(String),
    #[error("Database query error: {0}")]
    QueryError(String),
    #[error("Could not run database migrations: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for SqliteDatabaseError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(de)
                if de.is_unique_violation() || de.is_foreign_key_violation() || de.is_check_violation() =>
            {
                Self::IntegrityError(de.message().to_string())
            },
            e => Self::DriverError(e),
        }
    }
}

macro_rules! api_error_from_sqlite {
    ($api_error:ident) => {
        impl From<SqliteDatabaseError> for $api_error {
            fn from(e: SqliteDatabaseError) -> Self {
                match e {
                    SqliteDatabaseError::IntegrityError(msg) => Self::IntegrityError(msg),
                    e => {
                        error!("🗃️ {e}");
                        Self::DatabaseError(e.to_string())
                    },
                }
            }
        }
    };
}

api_error_from_sqlite!(AccountApiError);
api_error_from_sqlite!(CatalogApiError);
api_error_from_sqlite!(BasketApiError);
api_error_from_sqlite!(OrderFlowApiError);

impl From<SqliteDatabaseError> for AuthApiError {
    fn from(e: SqliteDatabaseError) -> Self {
        error!("🗃️ {e}");
        Self::DatabaseError(e.to_string())
    }
}
