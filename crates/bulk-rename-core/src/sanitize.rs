//! Filesystem-safe name substitution

use std::fmt::Display;

/// Characters that are not allowed in a file or folder name on common platforms
pub const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace every reserved character with `_`
///
/// Accepts anything printable; the string representation is sanitized.
pub fn sanitize(name: impl Display) -> String {
    name.to_string()
        .chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}
