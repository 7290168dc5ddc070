/// True if the string is non-empty and made of ASCII digits only.
pub fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a comma-separated id list such as `"1,2,3"`.
///
/// Entries that are not purely numeric (after trimming) are skipped without complaint, so `"1,a,3"` yields `[1, 3]`.
pub fn parse_id_list(s: &str) -> Vec<i64> {
    s.split(',').map(str::trim).filter(|s| is_digits(s)).filter_map(|s| s.parse::<i64>().ok()).collect()
}
