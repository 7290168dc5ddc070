use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use b2b_engine::{
    db_types::FieldErrors,
    AccountApiError,
    AuthApiError,
    BasketApiError,
    CatalogApiError,
    OrderFlowApiError,
};
use log::error;
use serde_json::json;
use thiserror::Error;

pub const MISSING_ARGUMENTS: &str = "Not all required arguments were provided";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("{MISSING_ARGUMENTS}")]
    MissingArguments,
    #[error("Invalid arguments")]
    InvalidArguments,
    #[error("Invalid request format")]
    InvalidRequestFormat,
    #[error("Validation failed. {0:?}")]
    ValidationFailed(FieldErrors),
    /// The database refused the change. The text is passed through to the caller as is.
    #[error("{0}")]
    IntegrityError(String),
    #[error("Log in required")]
    LoginRequired,
    #[error("exclusively for stores")]
    ShopsOnly,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Could not authorize")]
    CouldNotAuthorize,
    #[error("{0}")]
    NoRecordFound(String),
    #[error("Could not load the price list. {0}")]
    PriceListError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
}

impl ServerError {
    /// Authorization failures report under `Error`; everything else under `Errors`.
    fn body(&self) -> serde_json::Value {
        match self {
            Self::LoginRequired | Self::ShopsOnly | Self::InvalidToken => {
                json!({ "Status": false, "Error": self.to_string() })
            },
            Self::ValidationFailed(fields) => json!({ "Status": false, "Errors": fields }),
            _ => json!({ "Status": false, "Errors": self.to_string() }),
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingArguments => StatusCode::BAD_REQUEST,
            Self::InvalidArguments => StatusCode::BAD_REQUEST,
            Self::InvalidRequestFormat => StatusCode::BAD_REQUEST,
            Self::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            Self::IntegrityError(_) => StatusCode::BAD_REQUEST,
            Self::CouldNotAuthorize => StatusCode::BAD_REQUEST,
            Self::PriceListError(_) => StatusCode::BAD_REQUEST,
            Self::LoginRequired => StatusCode::FORBIDDEN,
            Self::ShopsOnly => StatusCode::FORBIDDEN,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(self.body().to_string())
    }
}

fn backend_error<E: std::fmt::Display>(e: E) -> ServerError {
    error!("💻️ Backend failure. {e}");
    ServerError::BackendError(e.to_string())
}

impl From<AccountApiError> for ServerError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::DatabaseError(_) | AccountApiError::PasswordError(_) => backend_error(e),
            AccountApiError::IntegrityError(s) => Self::IntegrityError(s),
            AccountApiError::ValidationError(fields) => Self::ValidationFailed(fields),
            AccountApiError::UserNotFound => Self::NoRecordFound(e.to_string()),
            AccountApiError::NoActiveUser => Self::InvalidArguments,
            AccountApiError::InvalidToken => Self::InvalidArguments,
            AccountApiError::ContactNotFound => Self::InvalidArguments,
        }
    }
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::DatabaseError(_) => backend_error(e),
            AuthApiError::InvalidCredentials => Self::CouldNotAuthorize,
            AuthApiError::InvalidToken => Self::InvalidToken,
        }
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::DatabaseError(_) => backend_error(e),
            CatalogApiError::IntegrityError(s) => Self::IntegrityError(s),
            CatalogApiError::NotAShop => Self::ShopsOnly,
            CatalogApiError::ShopNotFound => Self::NoRecordFound(e.to_string()),
            CatalogApiError::FeedError(_) => Self::PriceListError(e.to_string()),
        }
    }
}

impl From<BasketApiError> for ServerError {
    fn from(e: BasketApiError) -> Self {
        match e {
            BasketApiError::DatabaseError(_) => backend_error(e),
            BasketApiError::IntegrityError(s) => Self::IntegrityError(s),
        }
    }
}

impl From<OrderFlowApiError> for ServerError {
    fn from(e: OrderFlowApiError) -> Self {
        match e {
            OrderFlowApiError::DatabaseError(_) => backend_error(e),
            OrderFlowApiError::IntegrityError(s) => Self::IntegrityError(s),
            OrderFlowApiError::InvalidContact => Self::InvalidArguments,
            OrderFlowApiError::ForbiddenStateTransition(_) => Self::InvalidArguments,
            OrderFlowApiError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
        }
    }
}
