//! Building-id slugs.
//!
//! Building ids double as storage keys and URL path segments, so they are
//! restricted to lowercase ASCII alphanumerics and hyphens. Editors derive the
//! id from the display name with [`sanitize_building_id`]; the server accepts
//! only ids that pass [`is_valid_building_id`].

#[cfg(test)]
#[path = "slug_test.rs"]
mod slug_test;

/// Minimum accepted id length.
pub const MIN_ID_LEN: usize = 3;

/// Maximum accepted id length.
pub const MAX_ID_LEN: usize = 50;

/// Derive a URL-safe id from a display name.
///
/// Lower-cases and trims the input, replaces each character outside
/// `[a-z0-9-]` with a hyphen, collapses hyphen runs and strips leading and
/// trailing hyphens. Applying it twice gives the same result as applying it once.
#[must_use]
pub fn sanitize_building_id(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for ch in lowered.trim().chars() {
        let ch = if is_slug_char(ch) { ch } else { '-' };
        if ch == '-' && out.ends_with('-') {
            continue;
        }
        out.push(ch);
    }
    out.trim_matches('-').to_owned()
}

/// Whether `id` matches `^[a-z0-9-]{3,50}$`.
#[must_use]
pub fn is_valid_building_id(id: &str) -> bool {
    (MIN_ID_LEN..=MAX_ID_LEN).contains(&id.len()) && id.chars().all(is_slug_char)
}

fn is_slug_char(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-'
}
