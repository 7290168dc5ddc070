use rand::{thread_rng, RngCore};

/// A fresh random 40-character lowercase hex token, used for API keys and the one-shot e-mail tokens.
pub fn new_token() -> String {
    let mut bytes = [0u8; 20];
    thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
