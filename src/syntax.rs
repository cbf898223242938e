//! Contracts supplied by the front-end adapter layer: syntax nodes, semantic
//! bindings, per-file import tables and standard-library lookup.
//!
//! The resolver only talks to a compiler front-end through these traits.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::Result;
use crate::lazy::BoxFuture;
use crate::names::{DeclaredName, Language, PackageName};

/// Stable identity of a syntax node within its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Minimal view of a front-end syntax tree node.
pub trait SyntaxNode: Send + Sync {
    fn id(&self) -> NodeId;

    /// Immediate children, in source order.
    fn children(&self) -> Vec<Arc<dyn SyntaxNode>>;

    /// Source text covered by this node.
    fn text(&self) -> &str;
}

/// Which slice of binding information to fetch for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceKey {
    /// The declaration a reference expression points to.
    ReferenceTarget,
    /// The declaration introduced by a declaring node.
    Declaration,
    /// The static type of an expression.
    ExpressionType,
}

/// A value answered by the semantic binding facility.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingValue {
    Declaration(DeclaredName),
    QualifiedName(String),
}

/// Opaque handle onto the front-end's binding context.
pub trait SemanticBinding: Send + Sync {
    fn lookup<'a>(
        &'a self,
        key: SliceKey,
        node: &'a dyn SyntaxNode,
    ) -> BoxFuture<'a, Result<Option<BindingValue>>>;
}

/// Alias text to fully-qualified replacement, e.g. `Foo -> com.bar.Foo` for
/// `import com.bar.Foo as Foo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportAliasTable(BTreeMap<String, String>);

impl ImportAliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.0.insert(alias.into(), target.into());
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.0.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<A: Into<String>, T: Into<String>> FromIterator<(A, T)> for ImportAliasTable {
    fn from_iter<I: IntoIterator<Item = (A, T)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(a, t)| (a.into(), t.into())).collect())
    }
}

/// Deterministic identifier of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(String);

impl FileId {
    /// Derives the id from the file path.
    ///
    /// The format is `"file:32hexchars"` where the hex portion is the first 32
    /// characters of the SHA-256 hash of the path.
    pub fn for_path(path: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(path.as_bytes());
        let hex_str = hex::encode(hasher.finalize());
        Self(format!("file:{}", &hex_str[..32]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The per-file context a reference is resolved in.
pub trait SourceFile: Send + Sync {
    fn id(&self) -> &FileId;
    fn path(&self) -> &str;
    fn package(&self) -> &PackageName;
    fn language(&self) -> Language;

    /// `None` when the front-end has no alias information for the file.
    fn import_aliases(&self) -> Option<&ImportAliasTable>;

    /// Fully-qualified, non-aliased single-name imports.
    fn imports(&self) -> &[String];
}

/// Plain-data [`SourceFile`].
#[derive(Debug, Clone)]
pub struct FileContext {
    id: FileId,
    path: String,
    package: PackageName,
    language: Language,
    aliases: Option<ImportAliasTable>,
    imports: Vec<String>,
}

impl FileContext {
    pub fn new(path: impl Into<String>, package: PackageName, language: Language) -> Self {
        let path = path.into();
        Self {
            id: FileId::for_path(&path),
            path,
            package,
            language,
            aliases: None,
            imports: Vec::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: ImportAliasTable) -> Self {
        self.aliases = Some(aliases);
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases
            .get_or_insert_with(ImportAliasTable::new)
            .insert(alias, target);
        self
    }

    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.imports.push(import.into());
        self
    }

    /// Wraps this context for the resolver.
    pub fn shared(self) -> Arc<dyn SourceFile> {
        Arc::new(self)
    }
}

impl SourceFile for FileContext {
    fn id(&self) -> &FileId {
        &self.id
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn package(&self) -> &PackageName {
        &self.package
    }

    fn language(&self) -> Language {
        self.language
    }

    fn import_aliases(&self) -> Option<&ImportAliasTable> {
        self.aliases.as_ref()
    }

    fn imports(&self) -> &[String] {
        &self.imports
    }
}

/// Maps a raw short name to its standard-library qualified name, if any.
#[derive(Clone)]
pub struct StdlibLookup(Arc<dyn Fn(&str) -> Option<String> + Send + Sync>);

impl StdlibLookup {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Looks names up in a fixed table.
    pub fn from_table(table: BTreeMap<String, String>) -> Self {
        Self::from_fn(move |raw| table.get(raw).cloned())
    }

    /// A lookup that knows no names.
    pub fn empty() -> Self {
        Self::from_fn(|_| None)
    }

    pub fn lookup(&self, raw: &str) -> Option<String> {
        (self.0)(raw)
    }
}

impl Default for StdlibLookup {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for StdlibLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StdlibLookup(..)")
    }
}
