//! Primitives shared by the B2B engine and server crates.
mod price;

pub mod helpers;
pub mod op;
mod secret;

pub use helpers::{parse_boolean_flag, str_to_bool};
pub use price::Price;
pub use secret::Secret;
