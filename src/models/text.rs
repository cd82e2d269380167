/// Converts a human-readable name into a URL-safe slug.
///
/// Non-ASCII characters are transliterated, runs of anything that is not a
/// letter or digit collapse to one `-`, and the result is lowercase with no
/// leading or trailing dash.
#[must_use]
pub fn slugify(name: &str) -> String {
    ::slug::slugify(name.trim())
}

/// Returns the explicit slug when one was supplied, otherwise derives it from `name`.
#[must_use]
pub fn slug_or_derive(explicit: Option<&str>, name: &str) -> String {
    match explicit.map(str::trim) {
        Some(s) if !s.is_empty() => slugify(s),
        _ => slugify(name),
    }
}

/// Character used in `LIKE .. ESCAPE` patterns built by [`contains_pattern`].
pub const LIKE_ESCAPE: char = '\\';

/// `%term%` with the term's own `\`, `%` and `_` escaped, so the pattern
/// matches the term literally as a substring.
#[must_use]
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
