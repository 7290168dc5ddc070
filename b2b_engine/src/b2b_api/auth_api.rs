use std::fmt::Debug;

use log::*;

use crate::{db_types::User, helpers, traits::AuthManagement, AuthApiError};

/// `AuthApi` exchanges e-mail/password credentials for an API token, and resolves tokens back to users.
pub struct AuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Checks the credentials and returns the user's API token, creating it on first login.
    ///
    /// Unknown addresses, wrong passwords and accounts that have not confirmed their e-mail all fail with
    /// [`AuthApiError::InvalidCredentials`].
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthApiError> {
        let creds = self.db.fetch_credentials(email).await?.ok_or_else(|| {
            debug!("🔑️ Login attempt for unknown account {email}");
            AuthApiError::InvalidCredentials
        })?;
        helpers::verify_password(password, &creds.password_hash).map_err(|_| {
            debug!("🔑️ Wrong password for user #{}", creds.user_id);
            AuthApiError::InvalidCredentials
        })?;
        if !creds.is_active {
            debug!("🔑️ User #{} has not confirmed their e-mail address yet", creds.user_id);
            return Err(AuthApiError::InvalidCredentials);
        }
        let token = self.db.fetch_or_create_token(creds.user_id, &helpers::new_token()).await?;
        info!("🔑️ User #{} logged in", creds.user_id);
        Ok(token)
    }

    pub async fn authenticate(&self, token: &str) -> Result<User, AuthApiError> {
        self.db.fetch_user_for_token(token).await?.ok_or(AuthApiError::InvalidToken)
    }
}
