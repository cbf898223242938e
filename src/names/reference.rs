use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    append_segments, declared_matches_reference, segments_end_with, segments_start_with,
    split_segments, DeclaredName, Language, SimpleName, SEPARATOR,
};

/// A name as written at a use site, possibly unresolved, tagged with the
/// language it was authored in.
///
/// Two references are equal when both the text and the language match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "ReferenceNameRepr")]
pub struct ReferenceName {
    name: String,
    language: Language,
}

#[derive(Deserialize)]
struct ReferenceNameRepr {
    name: String,
    language: Language,
}

impl From<ReferenceNameRepr> for ReferenceName {
    fn from(repr: ReferenceNameRepr) -> Self {
        ReferenceName::new(repr.name, repr.language)
    }
}

impl ReferenceName {
    /// Surrounding whitespace in `raw` is dropped.
    pub fn new(raw: impl Into<String>, language: Language) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        let name = if trimmed.len() == raw.len() {
            raw
        } else {
            trimmed.to_string()
        };
        Self { name, language }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn segments(&self) -> Vec<&str> {
        split_segments(&self.name)
    }

    pub fn first_segment(&self) -> Option<&str> {
        self.segments().into_iter().next()
    }

    /// The last segment, or the whole text when unqualified.
    pub fn short_name(&self) -> &str {
        match self.name.rfind(SEPARATOR) {
            Some(idx) => &self.name[idx + 1..],
            None => &self.name,
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.name.contains(SEPARATOR)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        segments_start_with(&self.name, prefix)
    }

    pub fn ends_with(&self, suffix: &str) -> bool {
        segments_end_with(&self.name, suffix)
    }

    pub fn append(&self, name: &SimpleName) -> ReferenceName {
        Self {
            name: append_segments(&self.name, [name.as_str()]),
            language: self.language,
        }
    }

    /// Everything but the last segment, or `None` when unqualified.
    pub fn parent(&self) -> Option<ReferenceName> {
        let idx = self.name.rfind(SEPARATOR)?;
        Some(Self {
            name: self.name[..idx].to_string(),
            language: self.language,
        })
    }

    /// Substitutes `replacement` for the first segment, keeping the rest.
    /// `Foo.Baz` with `com.bar.Foo` becomes `com.bar.Foo.Baz`.
    pub fn replace_first_segment(&self, replacement: &str) -> ReferenceName {
        let rest = self.name.find(SEPARATOR).map(|idx| &self.name[idx + 1..]);
        Self {
            name: append_segments(replacement, rest),
            language: self.language,
        }
    }

    /// The same language tag with resolved text.
    pub fn resolved(&self, qualified: impl Into<String>) -> ReferenceName {
        ReferenceName::new(qualified, self.language)
    }

    pub fn with_language(&self, language: Language) -> ReferenceName {
        Self {
            name: self.name.clone(),
            language,
        }
    }
}

impl PartialEq<DeclaredName> for ReferenceName {
    fn eq(&self, other: &DeclaredName) -> bool {
        declared_matches_reference(other, self)
    }
}

impl fmt::Display for ReferenceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.language)
    }
}
