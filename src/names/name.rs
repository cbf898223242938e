use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::{declared_matches_reference, DeclaredName, ReferenceName};
use crate::errors::SymresError;

/// Either side of a declaration/use pair.
///
/// Equality follows the per-kind rules, and a declared name equals a
/// reference when the declaration is visible from the reference's language.
/// Mixed comparisons are not transitive, so `Name` is `PartialEq` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Name {
    Declared(DeclaredName),
    Reference(ReferenceName),
}

impl Name {
    /// The qualified (or raw, for unresolved references) text.
    pub fn as_str(&self) -> &str {
        match self {
            Name::Declared(d) => d.as_str(),
            Name::Reference(r) => r.as_str(),
        }
    }

    pub fn segments(&self) -> Vec<&str> {
        match self {
            Name::Declared(d) => d.segments(),
            Name::Reference(r) => r.segments(),
        }
    }

    pub fn as_declared(&self) -> Option<&DeclaredName> {
        match self {
            Name::Declared(d) => Some(d),
            Name::Reference(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ReferenceName> {
        match self {
            Name::Reference(r) => Some(r),
            Name::Declared(_) => None,
        }
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Name::Declared(a), Name::Declared(b)) => a == b,
            (Name::Reference(a), Name::Reference(b)) => a == b,
            (Name::Declared(d), Name::Reference(r)) | (Name::Reference(r), Name::Declared(d)) => {
                declared_matches_reference(d, r)
            }
        }
    }
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Equal names always share their qualified text.
        self.as_str().hash(state);
    }
}

impl From<DeclaredName> for Name {
    fn from(name: DeclaredName) -> Self {
        Name::Declared(name)
    }
}

impl From<ReferenceName> for Name {
    fn from(name: ReferenceName) -> Self {
        Name::Reference(name)
    }
}

impl TryFrom<Name> for DeclaredName {
    type Error = SymresError;

    fn try_from(name: Name) -> Result<Self, Self::Error> {
        match name {
            Name::Declared(d) => Ok(d),
            Name::Reference(r) => Err(SymresError::validation(format!(
                "'{}' is a reference, not a declaration",
                r.as_str()
            ))),
        }
    }
}

impl TryFrom<Name> for ReferenceName {
    type Error = SymresError;

    fn try_from(name: Name) -> Result<Self, Self::Error> {
        match name {
            Name::Reference(r) => Ok(r),
            Name::Declared(d) => Err(SymresError::validation(format!(
                "'{}' is a declaration, not a reference",
                d.as_str()
            ))),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Name::Declared(d) => d.fmt(f),
            Name::Reference(r) => r.fmt(f),
        }
    }
}
