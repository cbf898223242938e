//! Names synthesized by a framework rather than written in source.
//!
//! Every generated name remembers the reference names it was derived from,
//! and derivation is a pure function of those sources.

use serde::{Deserialize, Serialize};

use super::{split_segments, DeclaredName, Language, LanguageSet, PackageName, ReferenceName, SimpleName};
use crate::errors::{Result, SymresError};

/// A name that exists only because a framework generated it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratedName {
    Resource(ResourceName),
    Accessor(AccessorName),
}

impl GeneratedName {
    pub fn declared(&self) -> &DeclaredName {
        match self {
            GeneratedName::Resource(r) => r.declared(),
            GeneratedName::Accessor(a) => a.declared(),
        }
    }

    pub fn sources(&self) -> &[ReferenceName] {
        match self {
            GeneratedName::Resource(r) => r.sources(),
            GeneratedName::Accessor(a) => a.sources(),
        }
    }

    pub fn as_str(&self) -> &str {
        self.declared().as_str()
    }
}

impl From<GeneratedName> for DeclaredName {
    fn from(name: GeneratedName) -> Self {
        match name {
            GeneratedName::Resource(r) => r.declared,
            GeneratedName::Accessor(a) => a.declared,
        }
    }
}

/// A resource field such as `com.app.R.string.title`, built from the
/// namespace root (`com.app.R` or just `com.app`) and a resource reference
/// (`R.string.title` or `string.title`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceName {
    declared: DeclaredName,
    sources: Vec<ReferenceName>,
}

impl ResourceName {
    /// Simple name of the generated resource class.
    pub const NAMESPACE_CLASS: &'static str = "R";

    pub fn derive(namespace_root: &ReferenceName, resource: &ReferenceName) -> Result<Self> {
        let root = namespace_root.as_str();
        let package = root
            .strip_suffix(Self::NAMESPACE_CLASS)
            .filter(|rest| rest.is_empty() || rest.ends_with('.'))
            .map(|rest| rest.trim_end_matches('.'))
            .unwrap_or(root);

        let mut parts = split_segments(resource.as_str());
        if parts.first() == Some(&Self::NAMESPACE_CLASS) {
            parts.remove(0);
        }
        let [resource_type, ident] = parts.as_slice() else {
            return Err(SymresError::validation(format!(
                "resource reference '{}' must have the form [R.]type.name",
                resource.as_str()
            )));
        };

        let names = vec![
            SimpleName::new(Self::NAMESPACE_CLASS)?,
            SimpleName::new(*resource_type)?,
            SimpleName::new(*ident)?,
        ];
        let declared = DeclaredName::new(PackageName::new(Some(package)), names, LanguageSet::all())?;

        Ok(Self {
            declared,
            sources: vec![namespace_root.clone(), resource.clone()],
        })
    }

    pub fn declared(&self) -> &DeclaredName {
        &self.declared
    }

    pub fn sources(&self) -> &[ReferenceName] {
        &self.sources
    }

    /// `string` in `com.app.R.string.title`.
    pub fn resource_type(&self) -> &SimpleName {
        &self.declared.names()[1]
    }

    /// `title` in `com.app.R.string.title`.
    pub fn resource_name(&self) -> &SimpleName {
        &self.declared.names()[2]
    }

    pub fn as_str(&self) -> &str {
        self.declared.as_str()
    }
}

/// Whether an accessor reads or writes its property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    Getter,
    Setter,
}

/// A Java-visible accessor synthesized for a Kotlin property, e.g.
/// `com.foo.User.getTitle` for `com.foo.User.title`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessorName {
    declared: DeclaredName,
    kind: AccessorKind,
    sources: Vec<ReferenceName>,
}

impl AccessorName {
    /// Derives the accessor for `property`, which must be a member of a
    /// class and written as a plain identifier.
    pub fn derive(property: &DeclaredName, kind: AccessorKind) -> Result<Self> {
        let Some(owner) = property.parent() else {
            return Err(SymresError::validation(format!(
                "property '{}' has no owning class to host an accessor",
                property.as_str()
            )));
        };
        let field = property.short_name();
        if field.is_escaped() {
            return Err(SymresError::validation(format!(
                "cannot synthesize an accessor for escaped property '{field}'"
            )));
        }

        let accessor = SimpleName::new(accessor_identifier(field.as_str(), kind))?;
        let declared = owner
            .append(accessor)
            .with_languages(LanguageSet::from(Language::Java))?;

        Ok(Self {
            declared,
            kind,
            sources: vec![ReferenceName::new(property.as_str(), Language::Kotlin)],
        })
    }

    pub fn declared(&self) -> &DeclaredName {
        &self.declared
    }

    pub fn kind(&self) -> AccessorKind {
        self.kind
    }

    pub fn sources(&self) -> &[ReferenceName] {
        &self.sources
    }

    pub fn as_str(&self) -> &str {
        self.declared.as_str()
    }
}

/// `title` -> `getTitle`/`setTitle`; `isOpen` -> `isOpen`/`setOpen`.
fn accessor_identifier(field: &str, kind: AccessorKind) -> String {
    let is_boolean_style = field
        .strip_prefix("is")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| !c.is_lowercase());

    match (kind, is_boolean_style) {
        (AccessorKind::Getter, true) => field.to_string(),
        (AccessorKind::Setter, true) => format!("set{}", &field[2..]),
        (AccessorKind::Getter, false) => format!("get{}", capitalize(field)),
        (AccessorKind::Setter, false) => format!("set{}", capitalize(field)),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
