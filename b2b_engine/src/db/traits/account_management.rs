use crate::{
    db_types::{Contact, ContactUpdate, NewContact, NewUser, User, UserUpdate},
    AccountApiError,
};

/// The `AccountManagement` trait defines behaviour for managing user accounts and their delivery contacts.
///
/// Passwords never reach the backend in clear text; the API layer hashes them first.
#[allow(async_fn_in_trait)]
pub trait AccountManagement {
    /// Creates a new, inactive user together with the token that will activate it.
    async fn create_user(
        &self,
        user: &NewUser,
        password_hash: &str,
        confirm_token: &str,
    ) -> Result<User, AccountApiError>;

    /// Activates the user with the given e-mail if `token` is their outstanding confirmation token. The token is
    /// consumed. Returns `false` if the pair does not match.
    async fn confirm_email(&self, email: &str, token: &str) -> Result<bool, AccountApiError>;

    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, AccountApiError>;

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError>;

    /// Applies a partial update and returns the updated user.
    async fn update_user(&self, user_id: i64, update: UserUpdate) -> Result<User, AccountApiError>;

    async fn fetch_contacts(&self, user_id: i64) -> Result<Vec<Contact>, AccountApiError>;

    async fn create_contact(&self, user_id: i64, contact: &NewContact) -> Result<Contact, AccountApiError>;

    /// Updates one of the user's contacts. Returns `None` if the user has no contact with that id.
    async fn update_contact(
        &self,
        user_id: i64,
        contact_id: i64,
        update: ContactUpdate,
    ) -> Result<Option<Contact>, AccountApiError>;

    /// Deletes those of the given contacts that belong to the user, returning how many were deleted.
    async fn delete_contacts(&self, user_id: i64, ids: &[i64]) -> Result<u64, AccountApiError>;

    async fn create_password_reset_token(&self, user_id: i64, token: &str) -> Result<(), AccountApiError>;

    /// Replaces the password of the user holding `token`, consuming the token. Returns the user, or `None` if the
    /// token is unknown.
    async fn reset_password(&self, token: &str, password_hash: &str) -> Result<Option<User>, AccountApiError>;
}
