use std::fmt;
use std::sync::Arc;

use crate::lazy::LazyCollection;
use crate::names::{DeclaredName, Language, ReferenceName};
use crate::syntax::{SemanticBinding, SourceFile, StdlibLookup, SyntaxNode};

/// The request an interceptor sees: the file, the (possibly rewritten)
/// reference, and the lookup facilities supplied by the adapter layer.
///
/// Packets are immutable; interceptors derive modified copies with
/// [`with_reference`](Self::with_reference).
#[derive(Clone)]
pub struct ResolutionPacket {
    file: Arc<dyn SourceFile>,
    reference: ReferenceName,
    original: String,
    stdlib: StdlibLookup,
    binding: Option<Arc<dyn SemanticBinding>>,
    node: Option<Arc<dyn SyntaxNode>>,
    declarations: Option<LazyCollection<DeclaredName>>,
}

impl ResolutionPacket {
    pub fn new(file: Arc<dyn SourceFile>, raw: &str, language: Language, stdlib: StdlibLookup) -> Self {
        let reference = ReferenceName::new(raw, language);
        Self {
            file,
            original: reference.as_str().to_string(),
            reference,
            stdlib,
            binding: None,
            node: None,
            declarations: None,
        }
    }

    pub fn with_binding(mut self, binding: Option<Arc<dyn SemanticBinding>>) -> Self {
        self.binding = binding;
        self
    }

    pub fn with_node(mut self, node: Option<Arc<dyn SyntaxNode>>) -> Self {
        self.node = node;
        self
    }

    pub fn with_declarations(mut self, declarations: Option<LazyCollection<DeclaredName>>) -> Self {
        self.declarations = declarations;
        self
    }

    /// A copy carrying a rewritten reference. The original text is kept.
    pub fn with_reference(mut self, reference: ReferenceName) -> Self {
        self.reference = reference;
        self
    }

    pub fn file(&self) -> &Arc<dyn SourceFile> {
        &self.file
    }

    /// The current reference, after any rewrites by earlier interceptors.
    pub fn reference(&self) -> &ReferenceName {
        &self.reference
    }

    /// The current reference text.
    pub fn raw(&self) -> &str {
        self.reference.as_str()
    }

    /// The text the request started with.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn language(&self) -> Language {
        self.reference.language()
    }

    pub fn stdlib(&self) -> &StdlibLookup {
        &self.stdlib
    }

    pub fn binding(&self) -> Option<&Arc<dyn SemanticBinding>> {
        self.binding.as_ref()
    }

    pub fn node(&self) -> Option<&Arc<dyn SyntaxNode>> {
        self.node.as_ref()
    }

    pub fn declarations(&self) -> Option<&LazyCollection<DeclaredName>> {
        self.declarations.as_ref()
    }
}

impl fmt::Debug for ResolutionPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionPacket")
            .field("file", &self.file.path())
            .field("reference", &self.reference)
            .field("original", &self.original)
            .field("binding", &self.binding.is_some())
            .field("node", &self.node.as_ref().map(|n| n.id()))
            .field("declarations", &self.declarations.is_some())
            .finish()
    }
}
