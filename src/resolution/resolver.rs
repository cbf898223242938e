use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::chain::{run_chain, Interceptor, Resolution};
use super::{CacheKey, InterceptorKind, ResolutionCache, ResolutionPacket};
use crate::config::ResolverConfig;
use crate::errors::Result;
use crate::lazy::LazyCollection;
use crate::names::{DeclaredName, Language, ReferenceName};
use crate::syntax::{SemanticBinding, SourceFile, StdlibLookup, SyntaxNode};

/// Entry point for resolving references.
///
/// Holds a fixed, ordered interceptor chain plus the lookup facilities every
/// packet carries. When a cache is attached, each `(file, raw text,
/// language)` request runs the chain at most once; identical concurrent
/// requests share that single run.
pub struct NameResolver {
    interceptors: Arc<[Arc<dyn Interceptor>]>,
    stdlib: StdlibLookup,
    binding: Option<Arc<dyn SemanticBinding>>,
    declarations: Option<LazyCollection<DeclaredName>>,
    cache: Option<Arc<ResolutionCache>>,
}

/// A reference paired with what it resolved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedReference {
    pub original: ReferenceName,
    pub resolved: ReferenceName,
}

/// Result of resolving a batch of references in one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub resolved: Vec<ResolvedReference>,
    /// References no interceptor could resolve, kept as written.
    pub unresolved: Vec<ReferenceName>,
    pub total: usize,
}

impl NameResolver {
    pub fn factory() -> Factory {
        Factory::new()
    }

    /// Resolves `raw` as written in `file`. `Ok(None)` means the symbol is
    /// unknown; errors come from failing lookups further down the chain.
    pub async fn resolve(
        &self,
        file: &Arc<dyn SourceFile>,
        raw: &str,
        language: Language,
    ) -> Resolution {
        let packet = self.packet(file, raw, language, None);
        self.dispatch(file, packet).await
    }

    /// Resolves the text of `node`, making the node available to the
    /// semantic binding stage.
    pub async fn resolve_node(
        &self,
        file: &Arc<dyn SourceFile>,
        node: &Arc<dyn SyntaxNode>,
        language: Language,
    ) -> Resolution {
        let packet = self.packet(file, node.text(), language, Some(Arc::clone(node)));
        self.dispatch(file, packet).await
    }

    /// Resolves every reference in `references`. Unresolved ones are kept
    /// as-is; the first failing lookup aborts the batch.
    pub async fn resolve_all(
        &self,
        file: &Arc<dyn SourceFile>,
        references: &[ReferenceName],
    ) -> Result<ResolutionSummary> {
        let mut summary = ResolutionSummary {
            total: references.len(),
            ..ResolutionSummary::default()
        };
        for reference in references {
            match self.resolve(file, reference.as_str(), reference.language()).await? {
                Some(resolved) => summary.resolved.push(ResolvedReference {
                    original: reference.clone(),
                    resolved,
                }),
                None => summary.unresolved.push(reference.clone()),
            }
        }
        Ok(summary)
    }

    /// Interceptor names, in chain order.
    pub fn interceptor_names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    pub fn cache(&self) -> Option<&Arc<ResolutionCache>> {
        self.cache.as_ref()
    }

    fn packet(
        &self,
        file: &Arc<dyn SourceFile>,
        raw: &str,
        language: Language,
        node: Option<Arc<dyn SyntaxNode>>,
    ) -> ResolutionPacket {
        ResolutionPacket::new(Arc::clone(file), raw, language, self.stdlib.clone())
            .with_binding(self.binding.clone())
            .with_node(node)
            .with_declarations(self.declarations.clone())
    }

    async fn dispatch(&self, file: &Arc<dyn SourceFile>, packet: ResolutionPacket) -> Resolution {
        let interceptors = Arc::clone(&self.interceptors);
        match &self.cache {
            Some(cache) => {
                let key = CacheKey::new(file.id().clone(), packet.original(), packet.language())
                    .with_node(packet.node().map(|node| node.id()));
                cache
                    .get_or_resolve(key, move || {
                        Box::pin(async move { run_chain(&interceptors, packet).await })
                    })
                    .await
            }
            None => run_chain(&interceptors, packet).await,
        }
    }
}

/// Assembles a [`NameResolver`] from an ordered interceptor list.
///
/// Interceptors run in the order they were added.
pub struct Factory {
    interceptors: Vec<Arc<dyn Interceptor>>,
    stdlib: StdlibLookup,
    binding: Option<Arc<dyn SemanticBinding>>,
    declarations: Option<LazyCollection<DeclaredName>>,
    cache: Option<Arc<ResolutionCache>>,
}

impl Factory {
    /// An empty chain with a private cache.
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
            stdlib: StdlibLookup::empty(),
            binding: None,
            declarations: None,
            cache: Some(Arc::new(ResolutionCache::new())),
        }
    }

    /// The built-in chain: alias expansion, semantic binding, explicit
    /// imports, declaration lookup, standard-library fallback.
    pub fn with_defaults() -> Self {
        Self::new().kinds(&InterceptorKind::DEFAULT_CHAIN)
    }

    /// The chain, standard-library table and caching policy from `config`.
    pub fn from_config(config: &ResolverConfig) -> Self {
        let factory = Self::new()
            .kinds(&config.interceptors)
            .stdlib(StdlibLookup::from_table(config.stdlib.clone()));
        if config.cache_results {
            factory
        } else {
            factory.without_cache()
        }
    }

    pub fn interceptor<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn shared_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn kinds(mut self, kinds: &[InterceptorKind]) -> Self {
        self.interceptors.extend(kinds.iter().map(InterceptorKind::build));
        self
    }

    pub fn stdlib(mut self, stdlib: StdlibLookup) -> Self {
        self.stdlib = stdlib;
        self
    }

    pub fn binding(mut self, binding: Arc<dyn SemanticBinding>) -> Self {
        self.binding = Some(binding);
        self
    }

    pub fn declarations(mut self, declarations: LazyCollection<DeclaredName>) -> Self {
        self.declarations = Some(declarations);
        self
    }

    /// Shares an existing cache, e.g. between resolvers over the same files.
    pub fn cache(mut self, cache: Arc<ResolutionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub fn build(self) -> NameResolver {
        tracing::debug!(
            interceptors = self.interceptors.len(),
            cached = self.cache.is_some(),
            "built name resolver"
        );
        NameResolver {
            interceptors: self.interceptors.into(),
            stdlib: self.stdlib,
            binding: self.binding,
            declarations: self.declarations,
            cache: self.cache,
        }
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}
