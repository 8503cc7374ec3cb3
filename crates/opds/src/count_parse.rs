// ABOUTME: Permissive decimal parsing for catalog count and size fields.
// ABOUTME: Non-numeric text becomes None so callers can default to 0 instead of failing.

/// Parses the decimal text content of a count or size element.
/// Returns None for empty or non-numeric text; callers default to 0.
pub fn parse_count(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<u64>().ok()
}
