//! UTF-8–safe string truncation for log fields.

/// Truncate a string to at most `max_bytes` bytes at a char boundary.
///
/// Channel URIs are bearer addresses, so only a prefix is ever logged.
#[inline]
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_string_unchanged() {
        assert_eq!(truncate_str("http://a", 32), "http://a");
    }

    #[test]
    fn truncates_ascii() {
        assert_eq!(truncate_str("https://db3.notify.live.net/x", 8), "https://");
    }

    #[test]
    fn snaps_back_to_char_boundary() {
        assert_eq!(truncate_str("ab—cd", 3), "ab");
        assert_eq!(truncate_str("ab—cd", 5), "ab—");
    }

    #[test]
    fn zero_budget() {
        assert_eq!(truncate_str("abc", 0), "");
    }
}
