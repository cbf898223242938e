//! Immutable name values: packages, simple identifiers, declared names and
//! language-tagged reference names.
//!
//! A [`DeclaredName`] and a [`ReferenceName`] compare equal when their
//! qualified strings match and the declaration is visible from the
//! reference's language. The rule is implemented once, in
//! [`declared_matches_reference`], and both `PartialEq` impls call it.

mod declared;
mod generated;
mod language;
mod name;
mod package;
mod reference;
mod simple;

pub use declared::DeclaredName;
pub use generated::{AccessorKind, AccessorName, GeneratedName, ResourceName};
pub use language::{Language, LanguageSet};
pub use name::Name;
pub use package::PackageName;
pub use reference::ReferenceName;
pub use simple::{is_escaped_identifier, is_plain_identifier, SimpleName};

/// Separator between segments of a qualified name.
pub const SEPARATOR: char = '.';

/// Cross-kind equality between a declaration and a reference.
pub fn declared_matches_reference(declared: &DeclaredName, reference: &ReferenceName) -> bool {
    declared.as_str() == reference.as_str() && declared.languages().contains(reference.language())
}

/// Joins `parts` onto `prefix`, omitting the leading separator when the
/// prefix is empty.
pub(crate) fn append_segments<'a, I>(prefix: &str, parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::from(prefix);
    for part in parts {
        if !out.is_empty() {
            out.push(SEPARATOR);
        }
        out.push_str(part);
    }
    out
}

/// Splits a qualified string into segments. An empty string has none.
pub(crate) fn split_segments(qualified: &str) -> Vec<&str> {
    if qualified.is_empty() {
        Vec::new()
    } else {
        qualified.split(SEPARATOR).collect()
    }
}

/// Segment-wise prefix check: `a.b.c` starts with `a.b` but not with `a.bc`.
pub(crate) fn segments_start_with(qualified: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    match qualified.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with(SEPARATOR),
        None => false,
    }
}

/// Segment-wise suffix check: `a.b.c` ends with `b.c` but not with `.c` or `bc`.
pub(crate) fn segments_end_with(qualified: &str, suffix: &str) -> bool {
    if suffix.is_empty() {
        return true;
    }
    match qualified.strip_suffix(suffix) {
        Some("") => true,
        Some(rest) => rest.ends_with(SEPARATOR),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_skips_leading_separator() {
        assert_eq!(append_segments("", ["x"]), "x");
        assert_eq!(append_segments("a.b", ["x", "y"]), "a.b.x.y");
    }

    #[test]
    fn segment_prefix_and_suffix() {
        assert!(segments_start_with("a.b.c", "a.b"));
        assert!(segments_start_with("a.b.c", "a.b.c"));
        assert!(!segments_start_with("a.bc", "a.b"));
        assert!(segments_end_with("a.b.c", "b.c"));
        assert!(!segments_end_with("a.bc", "c"));
        assert!(segments_end_with("a.b.c", ""));
    }

    #[test]
    fn split_empty_has_no_segments() {
        assert!(split_segments("").is_empty());
        assert_eq!(split_segments("a.b"), vec!["a", "b"]);
    }
}
