use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Source language a name was authored in or is visible from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Java,
    Kotlin,
}

#[allow(clippy::should_implement_trait)]
impl Language {
    /// Every supported language.
    pub const ALL: [Language; 2] = [Language::Java, Language::Kotlin];

    /// Returns the string representation of this language.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Kotlin => "kotlin",
        }
    }

    /// Parses a language tag, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<Language> {
        match s {
            "java" => Some(Language::Java),
            "kotlin" | "kt" => Some(Language::Kotlin),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of languages a declaration is visible from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageSet(BTreeSet<Language>);

impl LanguageSet {
    /// An empty set.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// A set containing every supported language.
    pub fn all() -> Self {
        Language::ALL.into_iter().collect()
    }

    pub fn contains(&self, language: Language) -> bool {
        self.0.contains(&language)
    }

    pub fn insert(&mut self, language: Language) -> bool {
        self.0.insert(language)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Language> + '_ {
        self.0.iter().copied()
    }
}

impl From<Language> for LanguageSet {
    fn from(language: Language) -> Self {
        let mut set = LanguageSet::new();
        set.insert(language);
        set
    }
}

impl FromIterator<Language> for LanguageSet {
    fn from_iter<I: IntoIterator<Item = Language>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for LanguageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<&str> = self.0.iter().map(Language::as_str).collect();
        write!(f, "[{}]", tags.join(", "))
    }
}
