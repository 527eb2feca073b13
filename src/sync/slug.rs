//! Team name normalization
//!
//! The slug is the join key between desired and observed teams: the remote
//! service derives the same identifier from a team's display name.

/// Normalize a display name into a team slug.
///
/// Lower-cases ASCII letters and replaces every character outside
/// `[a-z0-9-]` with `-`. Pure and total: identical input always yields
/// identical output, and non-empty input yields non-empty output.
pub fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
