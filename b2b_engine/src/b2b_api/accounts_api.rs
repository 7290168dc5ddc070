//! Unifies API for managing user accounts.

use std::fmt::Debug;

use log::*;

use crate::{
    account_objects::{UserDetail, UserDetailsUpdate},
    db_types::{Contact, ContactUpdate, FieldErrors, NewContact, NewUser, User, UserUpdate},
    events::{EventProducers, PasswordResetRequestedEvent, UserRegisteredEvent},
    helpers,
    traits::AccountManagement,
    AccountApiError,
};

/// The `AccountApi` handles the account life cycle: registration, e-mail confirmation, profile and contact
/// management, and password resets.
pub struct AccountApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: AccountManagement
{
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }

    /// Registers a new, inactive account. A [`UserRegisteredEvent`] carrying the confirmation token is published.
    ///
    /// Field problems (bad e-mail, weak password, duplicate account) are reported together as
    /// [`AccountApiError::ValidationError`].
    pub async fn register(&self, user: NewUser, password: &str) -> Result<User, AccountApiError> {
        let mut errors = FieldErrors::new();
        let email = user.email.trim().to_string();
        if !helpers::is_valid_email(&email) {
            errors.entry("email".into()).or_default().push("Enter a valid email address.".into());
        } else if self.db.fetch_user_by_email(&email).await?.is_some() {
            errors.entry("email".into()).or_default().push("User with this email already exists.".into());
        }
        let problems = helpers::validate_password(password, Some(&email));
        if !problems.is_empty() {
            errors.insert("password".into(), problems);
        }
        if !errors.is_empty() {
            debug!("👤️ Registration for {email} rejected: {errors:?}");
            return Err(AccountApiError::ValidationError(errors));
        }
        let hash = helpers::hash_password(password)?;
        let token = helpers::new_token();
        let user = NewUser { email, ..user };
        let user = self.db.create_user(&user, &hash, &token).await?;
        info!("👤️ New {} account #{} registered for {}", user.user_type, user.id, user.email);
        for producer in &self.producers.user_registered_producer {
            producer.publish_event(UserRegisteredEvent { user: user.clone(), token: token.clone() });
        }
        Ok(user)
    }

    /// Activates an account. Fails with [`AccountApiError::InvalidToken`] unless `token` is the outstanding
    /// confirmation token for `email`.
    pub async fn confirm_email(&self, email: &str, token: &str) -> Result<(), AccountApiError> {
        if self.db.confirm_email(email, token).await? {
            info!("👤️ {email} confirmed");
            Ok(())
        } else {
            Err(AccountApiError::InvalidToken)
        }
    }

    pub async fn user_details(&self, user_id: i64) -> Result<UserDetail, AccountApiError> {
        let user = self.db.fetch_user(user_id).await?.ok_or(AccountApiError::UserNotFound)?;
        let contacts = self.db.fetch_contacts(user_id).await?;
        Ok(UserDetail::new(user, contacts))
    }

    /// Applies a partial update to the user's own details. A new password must pass the same rules as at
    /// registration.
    pub async fn update_details(&self, user_id: i64, update: UserDetailsUpdate) -> Result<UserDetail, AccountApiError> {
        let current = self.db.fetch_user(user_id).await?.ok_or(AccountApiError::UserNotFound)?;
        let mut errors = FieldErrors::new();
        if let Some(email) = update.email.as_deref() {
            if !helpers::is_valid_email(email) {
                errors.entry("email".into()).or_default().push("Enter a valid email address.".into());
            } else if let Some(other) = self.db.fetch_user_by_email(email).await? {
                if other.id != user_id {
                    errors.entry("email".into()).or_default().push("User with this email already exists.".into());
                }
            }
        }
        let password_hash = match update.password.as_deref() {
            Some(password) => {
                let email = update.email.as_deref().unwrap_or(current.email.as_str());
                let problems = helpers::validate_password(password, Some(email));
                if problems.is_empty() {
                    Some(helpers::hash_password(password)?)
                } else {
                    errors.insert("password".into(), problems);
                    None
                }
            },
            None => None,
        };
        if !errors.is_empty() {
            return Err(AccountApiError::ValidationError(errors));
        }
        let db_update = UserUpdate {
            email: update.email,
            first_name: update.first_name,
            last_name: update.last_name,
            company: update.company,
            position: update.position,
            password_hash,
        };
        let user = self.db.update_user(user_id, db_update).await?;
        debug!("👤️ User #{user_id} updated their details");
        let contacts = self.db.fetch_contacts(user_id).await?;
        Ok(UserDetail::new(user, contacts))
    }

    pub async fn contacts(&self, user_id: i64) -> Result<Vec<Contact>, AccountApiError> {
        self.db.fetch_contacts(user_id).await
    }

    pub async fn create_contact(&self, user_id: i64, contact: NewContact) -> Result<Contact, AccountApiError> {
        let mut errors = FieldErrors::new();
        for (field, value) in [("city", &contact.city), ("street", &contact.street), ("phone", &contact.phone)] {
            if value.trim().is_empty() {
                errors.insert(field.into(), vec!["This field may not be blank.".into()]);
            }
        }
        if !errors.is_empty() {
            return Err(AccountApiError::ValidationError(errors));
        }
        self.db.create_contact(user_id, &contact).await
    }

    /// Updates one of the user's contacts. A contact that does not exist, or belongs to someone else, yields
    /// [`AccountApiError::ContactNotFound`].
    pub async fn update_contact(
        &self,
        user_id: i64,
        contact_id: i64,
        update: ContactUpdate,
    ) -> Result<Contact, AccountApiError> {
        self.db.update_contact(user_id, contact_id, update).await?.ok_or(AccountApiError::ContactNotFound)
    }

    pub async fn delete_contacts(&self, user_id: i64, ids: &[i64]) -> Result<u64, AccountApiError> {
        self.db.delete_contacts(user_id, ids).await
    }

    /// Issues a password reset token for an active account and publishes a [`PasswordResetRequestedEvent`].
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AccountApiError> {
        let user = match self.db.fetch_user_by_email(email).await? {
            Some(u) if u.is_active => u,
            _ => return Err(AccountApiError::NoActiveUser),
        };
        let token = helpers::new_token();
        self.db.create_password_reset_token(user.id, &token).await?;
        debug!("👤️ Password reset requested for user #{}", user.id);
        for producer in &self.producers.password_reset_producer {
            producer.publish_event(PasswordResetRequestedEvent { user: user.clone(), token: token.clone() });
        }
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<User, AccountApiError> {
        let problems = helpers::validate_password(password, None);
        if !problems.is_empty() {
            let mut errors = FieldErrors::new();
            errors.insert("password".into(), problems);
            return Err(AccountApiError::ValidationError(errors));
        }
        let hash = helpers::hash_password(password)?;
        let user = self.db.reset_password(token, &hash).await?.ok_or(AccountApiError::InvalidToken)?;
        info!("👤️ Password for user #{} has been reset", user.id);
        Ok(user)
    }
}
