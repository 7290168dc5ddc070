use crate::{
    db_types::{User, UserCredentials},
    AuthApiError,
};

/// The `AuthManagement` trait defines behaviour for authenticating users.
///
/// Users log in with their e-mail and password and receive an opaque API token, which they then send with every
/// request. A user has at most one token, and it does not expire.
#[allow(async_fn_in_trait)]
pub trait AuthManagement {
    async fn fetch_credentials(&self, email: &str) -> Result<Option<UserCredentials>, AuthApiError>;

    /// Returns the user's existing token, or stores `candidate` as their token if they have none yet.
    async fn fetch_or_create_token(&self, user_id: i64, candidate: &str) -> Result<String, AuthApiError>;

    /// Resolves a token to its (active) user.
    async fn fetch_user_for_token(&self, token: &str) -> Result<Option<User>, AuthApiError>;
}
