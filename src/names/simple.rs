use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SymresError};

/// Characters that may not appear inside a backtick-escaped identifier.
const FORBIDDEN_IN_ESCAPED: &[char] = &['`', '\r', '\n', '.', ';', '[', ']', '/', '<', '>', ':', '\\'];

/// A single unqualified identifier segment.
///
/// Either a plain identifier (`foo`, `_bar1`) or a backtick-escaped one
/// (`` `is visible` ``). Never contains a separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SimpleName(String);

impl SimpleName {
    /// Validates `value` against the identifier grammar.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if is_plain_identifier(&value) || is_escaped_identifier(&value) {
            Ok(Self(value))
        } else {
            Err(SymresError::validation(format!(
                "'{value}' is not a valid identifier"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_escaped(&self) -> bool {
        self.0.starts_with('`')
    }

    /// The identifier without surrounding backticks.
    pub fn unescaped(&self) -> &str {
        if self.is_escaped() {
            &self.0[1..self.0.len() - 1]
        } else {
            &self.0
        }
    }
}

/// `[letter or _][letter, digit or _]*`
pub fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// A backtick-quoted, non-empty identifier free of separators and line breaks.
pub fn is_escaped_identifier(s: &str) -> bool {
    let Some(inner) = s.strip_prefix('`').and_then(|rest| rest.strip_suffix('`')) else {
        return false;
    };
    !inner.is_empty() && !inner.contains(FORBIDDEN_IN_ESCAPED)
}

impl TryFrom<String> for SimpleName {
    type Error = SymresError;

    fn try_from(value: String) -> Result<Self> {
        SimpleName::new(value)
    }
}

impl TryFrom<&str> for SimpleName {
    type Error = SymresError;

    fn try_from(value: &str) -> Result<Self> {
        SimpleName::new(value)
    }
}

impl From<SimpleName> for String {
    fn from(value: SimpleName) -> Self {
        value.0
    }
}

impl AsRef<str> for SimpleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SimpleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
