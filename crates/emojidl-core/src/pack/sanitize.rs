//! Filesystem-safe names for pack directories and emoji files.

/// Leaves room for `.png.part` under Linux NAME_MAX (255).
pub(crate) const NAME_MAX: usize = 240;

/// Sanitizes a pack or emoji name for use as a single path component.
///
/// - Replaces NUL, `/`, `\`, and control characters with `_`
/// - Collapses runs of replaced characters into one `_`
/// - Trims leading/trailing whitespace and dots (no `.`, `..`, or hidden names)
/// - Limits length to `NAME_MAX` bytes on a char boundary
///
/// Spaces inside the name are kept. May return an empty string; callers pick a fallback.
pub fn sanitize_component(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_replaced = false;

    for c in name.chars() {
        if c == '\0' || c == '/' || c == '\\' || c.is_control() {
            if !prev_replaced {
                out.push('_');
            }
            prev_replaced = true;
        } else {
            out.push(c);
            prev_replaced = false;
        }
    }

    let trimmed = out.trim_matches(|c: char| c.is_whitespace() || c == '.');
    truncate_bytes(trimmed, NAME_MAX).to_string()
}

/// Longest prefix of `s` that fits in `max` bytes, cut on a char boundary.
pub(crate) fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut take = max;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}
