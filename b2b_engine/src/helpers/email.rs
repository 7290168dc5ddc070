use std::sync::OnceLock;

use regex::Regex;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$").unwrap()
    })
}

/// A pragmatic e-mail address check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}
