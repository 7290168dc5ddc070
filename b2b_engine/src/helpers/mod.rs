mod email;
mod id_list;
mod passwords;
mod tokens;

pub use email::is_valid_email;
pub use id_list::{is_digits, parse_id_list};
pub use passwords::{hash_password, validate_password, verify_password, PasswordError};
pub use tokens::new_token;
