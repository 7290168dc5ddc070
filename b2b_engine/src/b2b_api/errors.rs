use thiserror::Error;

use crate::{
    db_types::{FieldErrors, OrderState},
    feed::FeedError,
    helpers::PasswordError,
};

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// A constraint violation reported by the database. The text is the raw database message.
    #[error("{0}")]
    IntegrityError(String),
    #[error("Validation failed: {0:?}")]
    ValidationError(FieldErrors),
    #[error("User not found")]
    UserNotFound,
    #[error("There is no active user associated with this e-mail address")]
    NoActiveUser,
    #[error("The token is invalid or has already been used")]
    InvalidToken,
    #[error("Contact not found")]
    ContactNotFound,
    #[error("Password error. {0}")]
    PasswordError(#[from] PasswordError),
}

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// Unknown e-mail, wrong password, or an account that has not been activated yet.
    #[error("Could not authorize")]
    InvalidCredentials,
    #[error("Invalid token")]
    InvalidToken,
}

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("{0}")]
    IntegrityError(String),
    #[error("Only supplier accounts can manage a shop")]
    NotAShop,
    #[error("No shop is registered for this account")]
    ShopNotFound,
    #[error("{0}")]
    FeedError(#[from] FeedError),
}

#[derive(Debug, Clone, Error)]
pub enum BasketApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("{0}")]
    IntegrityError(String),
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("{0}")]
    IntegrityError(String),
    #[error("The contact does not exist or belongs to someone else")]
    InvalidContact,
    #[error("Order #{0} was not found")]
    OrderNotFound(i64),
    #[error("Suppliers cannot move an order into the '{0}' state")]
    ForbiddenStateTransition(OrderState),
}
