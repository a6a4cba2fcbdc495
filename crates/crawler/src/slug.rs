use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^-\w.]").unwrap());

/// Turns a display name into a directory name.
///
/// Surrounding whitespace is trimmed, spaces become `_`, and anything that is
/// not a word character, `-`, `_` or `.` is dropped: `"Player's Unknown"`
/// becomes `"Players_Unknown"`. Results that would not name a directory of
/// their own (`""`, `"."`, `".."`) collapse to `"_"`.
pub fn slugify(value: &str) -> String {
    let spaced = value.trim().replace(' ', "_");
    let slug = DISALLOWED.replace_all(&spaced, "").into_owned();

    match slug.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => slug,
    }
}
