//! Reference syntax: splitting candidate references and literal detection.
//!
//! A string node is a reference only when it carries a dot and is not
//! path-like. `.name` is a local reference, `alias.name` a cross-document
//! reference; everything else stays a literal string.

/// Split a candidate reference on its first dot. `None` means no dot --
/// the string is a literal.
pub(crate) fn split_reference(raw: &str) -> Option<(&str, &str)> {
    raw.split_once('.')
}

/// Path-like strings are literals even when they contain dots: more than
/// one path segment, or a drive/volume prefix.
pub(crate) fn looks_like_path(raw: &str) -> bool {
    if raw.contains('/') || raw.contains('\\') {
        return true;
    }
    let bytes = raw.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
