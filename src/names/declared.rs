use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::{
    append_segments, declared_matches_reference, segments_end_with, segments_start_with,
    split_segments, Language, LanguageSet, PackageName, ReferenceName, SimpleName,
};
use crate::errors::{Result, SymresError};

/// A name introduced by a declaration (class, function, property, ...).
///
/// Made of a package, a non-empty list of simple names ordered outer to
/// inner (`Outer.Inner`), and the set of languages the declaration is
/// visible from. Two declared names are equal when their qualified strings
/// and language sets are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DeclaredNameRepr", into = "DeclaredNameRepr")]
pub struct DeclaredName {
    package: PackageName,
    names: Vec<SimpleName>,
    languages: LanguageSet,
    qualified: String,
}

#[derive(Serialize, Deserialize)]
struct DeclaredNameRepr {
    #[serde(default)]
    package: PackageName,
    names: Vec<SimpleName>,
    languages: LanguageSet,
}

impl DeclaredName {
    /// Composes a declared name. Fails when `names` or `languages` is empty.
    pub fn new(package: PackageName, names: Vec<SimpleName>, languages: LanguageSet) -> Result<Self> {
        if names.is_empty() {
            return Err(SymresError::validation(format!(
                "declared name in package '{package}' has no simple names"
            )));
        }
        if languages.is_empty() {
            return Err(SymresError::validation(format!(
                "declared name '{}' is not visible from any language",
                package.append(&names)
            )));
        }
        let qualified = package.append(&names);
        Ok(Self {
            package,
            names,
            languages,
            qualified,
        })
    }

    /// Parses `names` (dot-separated, e.g. `Outer.Inner`) under `package`.
    pub fn parse(package: &str, names: &str, languages: impl Into<LanguageSet>) -> Result<Self> {
        let simple = split_segments(names)
            .into_iter()
            .map(SimpleName::new)
            .collect::<Result<Vec<_>>>()?;
        Self::new(PackageName::new(Some(package)), simple, languages.into())
    }

    pub fn package(&self) -> &PackageName {
        &self.package
    }

    pub fn names(&self) -> &[SimpleName] {
        &self.names
    }

    pub fn languages(&self) -> &LanguageSet {
        &self.languages
    }

    /// The fully-qualified string, e.g. `com.foo.Outer.Inner`.
    pub fn as_str(&self) -> &str {
        &self.qualified
    }

    /// The innermost simple name.
    pub fn short_name(&self) -> &SimpleName {
        // `names` is non-empty by construction.
        &self.names[self.names.len() - 1]
    }

    /// Package segments followed by the simple names.
    pub fn segments(&self) -> Vec<&str> {
        split_segments(&self.qualified)
    }

    pub fn visible_from(&self, language: Language) -> bool {
        self.languages.contains(language)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        segments_start_with(&self.qualified, prefix)
    }

    pub fn ends_with(&self, suffix: &str) -> bool {
        segments_end_with(&self.qualified, suffix)
    }

    /// A nested declaration with the same visibility.
    pub fn append(&self, name: SimpleName) -> DeclaredName {
        let qualified = append_segments(&self.qualified, [name.as_str()]);
        let mut names = self.names.clone();
        names.push(name);
        DeclaredName {
            package: self.package.clone(),
            names,
            languages: self.languages.clone(),
            qualified,
        }
    }

    /// The enclosing declaration, or `None` for a top-level one.
    pub fn parent(&self) -> Option<DeclaredName> {
        if self.names.len() < 2 {
            return None;
        }
        let names = self.names[..self.names.len() - 1].to_vec();
        DeclaredName::new(self.package.clone(), names, self.languages.clone()).ok()
    }

    /// The same declaration with a different visibility.
    pub fn with_languages(&self, languages: LanguageSet) -> Result<DeclaredName> {
        DeclaredName::new(self.package.clone(), self.names.clone(), languages)
    }

    /// A resolved reference to this declaration from `language`, if visible.
    pub fn to_reference(&self, language: Language) -> Option<ReferenceName> {
        self.visible_from(language)
            .then(|| ReferenceName::new(self.qualified.clone(), language))
    }
}

impl PartialEq for DeclaredName {
    fn eq(&self, other: &Self) -> bool {
        self.qualified == other.qualified && self.languages == other.languages
    }
}

impl Eq for DeclaredName {}

impl Hash for DeclaredName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.qualified.hash(state);
        self.languages.hash(state);
    }
}

impl PartialEq<ReferenceName> for DeclaredName {
    fn eq(&self, other: &ReferenceName) -> bool {
        declared_matches_reference(self, other)
    }
}

impl TryFrom<DeclaredNameRepr> for DeclaredName {
    type Error = SymresError;

    fn try_from(repr: DeclaredNameRepr) -> Result<Self> {
        DeclaredName::new(repr.package, repr.names, repr.languages)
    }
}

impl From<DeclaredName> for DeclaredNameRepr {
    fn from(name: DeclaredName) -> Self {
        DeclaredNameRepr {
            package: name.package,
            names: name.names,
            languages: name.languages,
        }
    }
}

impl fmt::Display for DeclaredName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.qualified, self.languages)
    }
}
