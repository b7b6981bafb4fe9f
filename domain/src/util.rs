//! Shared utility functions.

/// Shorten text for log output, cutting on a UTF-8 boundary.
///
/// Text longer than `max_bytes` is cut and suffixed with `...`.
pub fn preview(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
