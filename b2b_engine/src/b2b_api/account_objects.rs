use serde::{Deserialize, Serialize};

use crate::db_types::{Contact, User};

/// A user's account details, as shown to the user themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetail {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub position: String,
    pub contacts: Vec<Contact>,
}

impl UserDetail {
    pub fn new(user: User, contacts: Vec<Contact>) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            company: user.company,
            position: user.position,
            contacts,
        }
    }
}

/// A partial update of the caller's own details. A new password, if given, is validated and hashed by
/// [`crate::AccountApi::update_details`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetailsUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub password: Option<String>,
}
