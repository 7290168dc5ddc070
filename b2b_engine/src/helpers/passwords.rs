use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 8;

const COMMON_PASSWORDS: [&str; 32] = [
    "password", "password1", "password123", "12345678", "123456789", "1234567890", "qwerty123", "qwertyuiop",
    "iloveyou", "sunshine", "princess", "football", "baseball", "welcome1", "admin123", "letmein1", "trustno1",
    "starwars", "whatever", "passw0rd", "superman", "michelle", "abc12345", "11111111", "00000000", "987654321",
    "qazwsxedc", "1q2w3e4r", "zaq12wsx", "dragon123", "monkey123", "computer",
];

#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Could not hash the password")]
    HashError,
    #[error("The password does not match")]
    Mismatch,
}

/// Checks a candidate password against the account password rules. Returns every rule it breaks, or an empty list.
///
/// `email` is the account's e-mail address; a password that contains its local part is refused.
pub fn validate_password(password: &str, email: Option<&str>) -> Vec<String> {
    let mut problems = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push(format!(
            "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
        ));
    }
    let lower = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lower.as_str()) {
        problems.push("This password is too common.".to_string());
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }
    let local_part = email.and_then(|e| e.split('@').next()).map(str::to_lowercase);
    if let Some(local) = local_part.filter(|l| l.len() >= 3) {
        if lower.contains(&local) {
            problems.push("The password is too similar to the email address.".to_string());
        }
    }
    problems
}

/// Hash a password using Argon2id with a random salt. The result is a self-describing PHC string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::HashError)
}

pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::Mismatch)?;
    Argon2::default().verify_password(password.as_bytes(), &parsed_hash).map_err(|_| PasswordError::Mismatch)
}
