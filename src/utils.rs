//! Small shared helpers.

/// Convert a display name to a filesystem/URL slug.
///
/// Lowercases alphanumerics and collapses everything else to `-`, trimming
/// leading and trailing dashes: `"Premier League"` becomes `"premier-league"`.
pub fn slugify(s: &str) -> String {
    let slug: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    slug.trim_matches('-').to_string()
}

/// Render an optional field for diff output and logs.
pub fn display_opt(value: Option<&str>) -> &str {
    value.unwrap_or("")
}
