use chrono::Utc;

/// Lowercase ASCII slug: runs of anything outside `[a-z0-9]` become a single
/// `-`, with no leading or trailing `-`.
///
/// Non-ASCII letters are dropped rather than transliterated, so
/// `"Citroën C3"` becomes `"citro-n-c3"`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// `brand-model-year`, slugified.
#[must_use]
pub fn vehicle_slug(brand: &str, model: &str, year: i32) -> String {
    slugify(&format!("{brand}-{model}-{year}"))
}

/// Disambiguate a taken slug with the current Unix time in milliseconds.
#[must_use]
pub fn with_timestamp_suffix(slug: &str) -> String {
    format!("{slug}-{}", Utc::now().timestamp_millis())
}
