//! JSON snapshots of a set of source files, standing in for a compiler
//! front-end when driving the resolver from the command line.
//!
//! ```json
//! {
//!   "files": [{
//!     "path": "app/Main.kt",
//!     "package": "com.app",
//!     "language": "kotlin",
//!     "aliases": { "Req": "com.net.Request" },
//!     "imports": ["com.app.model.User"],
//!     "declarations": [{ "names": "Main" }],
//!     "references": ["Req.Builder", "User", "List", "Unknown"]
//!   }]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::errors::{Result, SymresError};
use crate::lazy::{LazyCollection, Priority};
use crate::names::{DeclaredName, Language, LanguageSet, PackageName, ReferenceName};
use crate::resolution::{NameResolver, ResolutionSummary};
use crate::syntax::{FileContext, ImportAliasTable, SourceFile};

/// Suffix identifying snapshot files during discovery.
pub const SNAPSHOT_SUFFIX: &str = ".symres.json";

/// A set of files with their imports, declarations and references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub files: Vec<SnapshotFile>,
}

/// One source file in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub path: String,
    #[serde(default)]
    pub package: PackageName,
    /// Falls back to Kotlin, or to whatever
    /// [`Snapshot::with_default_language`] supplied.
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub aliases: Option<ImportAliasTable>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub declarations: Vec<SnapshotDeclaration>,
    #[serde(default)]
    pub references: Vec<String>,
}

/// A declaration in a snapshot file. Visible from the file's own language
/// unless `languages` says otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDeclaration {
    /// Dot-separated simple names, outer to inner.
    pub names: String,
    #[serde(default)]
    pub languages: Option<LanguageSet>,
}

/// Resolution results for one snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResolution {
    pub path: String,
    pub summary: ResolutionSummary,
}

impl Snapshot {
    /// Reads and parses a snapshot file.
    pub fn load(path: &Path) -> Result<Snapshot> {
        let contents = fs::read_to_string(path).map_err(|e| SymresError::Snapshot {
            message: format!("failed to read snapshot: {e}"),
            path: path.display().to_string(),
        })?;
        serde_json::from_str(&contents).map_err(|e| SymresError::Snapshot {
            message: format!("failed to parse snapshot: {e}"),
            path: path.display().to_string(),
        })
    }

    /// Returns `path` itself if it is a file, otherwise every
    /// `*.symres.json` below it, sorted.
    pub fn discover(path: &Path) -> Result<Vec<PathBuf>> {
        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }
        if !path.is_dir() {
            return Err(SymresError::Snapshot {
                message: "no such file or directory".to_string(),
                path: path.display().to_string(),
            });
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(path).into_iter().filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            e.depth() == 0 || !name.starts_with('.')
        }) {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            if entry.file_type().is_file()
                && entry.file_name().to_string_lossy().ends_with(SNAPSHOT_SUFFIX)
            {
                found.push(entry.into_path());
            }
        }
        found.sort();
        Ok(found)
    }

    /// Fills in the language of every file that does not declare one.
    pub fn with_default_language(mut self, language: Language) -> Snapshot {
        for file in &mut self.files {
            file.language.get_or_insert(language);
        }
        self
    }

    /// Merges several snapshots into one.
    pub fn merge(snapshots: impl IntoIterator<Item = Snapshot>) -> Snapshot {
        Snapshot {
            files: snapshots.into_iter().flat_map(|s| s.files).collect(),
        }
    }

    /// Every declaration in the snapshot, one collection source per file.
    ///
    /// A file's declarations are parsed when its source is first read, and
    /// an invalid one fails that read. Each source's hint rules out names
    /// from other packages, so [`LazyCollection::contains`] only parses the
    /// files whose package matches.
    pub fn declarations(&self) -> LazyCollection<DeclaredName> {
        let mut builder = LazyCollection::builder();
        for file in &self.files {
            let package = file.package.clone();
            let file = file.clone();
            builder = builder.source_with_hint(
                Priority::Normal,
                move |d: &DeclaredName| d.package() == &package,
                async move { file.declared_names() },
            );
        }
        builder.build()
    }

    /// Resolves every reference of every file with `resolver`.
    pub async fn resolve_with(&self, resolver: &NameResolver) -> Result<Vec<FileResolution>> {
        let mut results = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let context = file.context();
            let references: Vec<ReferenceName> = file
                .references
                .iter()
                .map(|raw| ReferenceName::new(raw.as_str(), file.language()))
                .collect();
            let summary = resolver.resolve_all(&context, &references).await?;
            tracing::debug!(
                path = %file.path,
                resolved = summary.resolved.len(),
                unresolved = summary.unresolved.len(),
                "resolved snapshot file"
            );
            results.push(FileResolution {
                path: file.path.clone(),
                summary,
            });
        }
        Ok(results)
    }
}

impl SnapshotFile {
    pub fn language(&self) -> Language {
        self.language.unwrap_or(Language::Kotlin)
    }

    /// The resolver's view of this file.
    pub fn context(&self) -> Arc<dyn SourceFile> {
        let mut context = FileContext::new(self.path.clone(), self.package.clone(), self.language());
        if let Some(aliases) = &self.aliases {
            context = context.with_aliases(aliases.clone());
        }
        for import in &self.imports {
            context = context.with_import(import.clone());
        }
        context.shared()
    }

    /// Validated declared names for this file.
    pub fn declared_names(&self) -> Result<Vec<DeclaredName>> {
        self.declarations
            .iter()
            .map(|d| {
                let languages = d
                    .languages
                    .clone()
                    .unwrap_or_else(|| LanguageSet::from(self.language()));
                DeclaredName::parse(self.package.as_str(), &d.names, languages)
            })
            .collect()
    }
}
