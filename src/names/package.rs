use std::fmt;

use serde::{Deserialize, Serialize};

use super::{append_segments, segments_start_with, split_segments, SimpleName, SEPARATOR};

/// A dot-separated namespace, or [`PackageName::DEFAULT`] for files without a
/// package declaration.
///
/// A non-default package never has a blank backing string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub struct PackageName(String);

impl PackageName {
    /// The unnamed package.
    pub const DEFAULT: PackageName = PackageName(String::new());

    /// Builds a package from an optional, possibly blank string. Blank input
    /// yields [`PackageName::DEFAULT`].
    pub fn new(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(s) if !s.is_empty() => Self(s.to_string()),
            _ => Self::DEFAULT,
        }
    }

    /// Builds a package from its segments.
    pub fn from_segments(segments: &[SimpleName]) -> Self {
        Self(append_segments("", segments.iter().map(SimpleName::as_str)))
    }

    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Package segments; empty for the default package.
    pub fn segments(&self) -> Vec<&str> {
        split_segments(&self.0)
    }

    /// Appends names to this package. The default package contributes no
    /// leading separator, so `DEFAULT.append(["x"]) == "x"`.
    pub fn append<S: AsRef<str>>(&self, names: &[S]) -> String {
        append_segments(&self.0, names.iter().map(AsRef::as_ref))
    }

    /// A sub-package of this one.
    pub fn child(&self, name: &SimpleName) -> PackageName {
        Self(self.append(&[name.as_str()]))
    }

    /// The enclosing package, or `None` for the default package.
    pub fn parent(&self) -> Option<PackageName> {
        if self.is_default() {
            return None;
        }
        match self.0.rfind(SEPARATOR) {
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => Some(Self::DEFAULT),
        }
    }

    /// Segment-wise containment: `com.foo` starts with `com` but not `co`.
    pub fn starts_with(&self, prefix: &PackageName) -> bool {
        segments_start_with(&self.0, &prefix.0)
    }
}

impl From<Option<String>> for PackageName {
    fn from(value: Option<String>) -> Self {
        PackageName::new(value.as_deref())
    }
}

impl From<&str> for PackageName {
    fn from(value: &str) -> Self {
        PackageName::new(Some(value))
    }
}

impl From<PackageName> for String {
    fn from(value: PackageName) -> Self {
        value.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
