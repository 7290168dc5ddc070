/// Interprets a truthy/falsy string, in the same way as Python's `strtobool`.
///
/// Accepted values (case-insensitive): `y`, `yes`, `t`, `true`, `on`, `1` and `n`, `no`, `f`, `false`, `off`, `0`.
/// Anything else yields `None`.
pub fn str_to_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Some(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    value.as_deref().and_then(str_to_bool).unwrap_or(default)
}
