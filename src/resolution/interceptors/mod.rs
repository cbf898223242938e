//! Built-in interceptors.

mod declaration_lookup;
mod explicit_import;
mod import_alias;
mod semantic_binding;
mod stdlib;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use declaration_lookup::DeclarationLookupInterceptor;
pub use explicit_import::ExplicitImportInterceptor;
pub use import_alias::ImportAliasInterceptor;
pub use semantic_binding::SemanticBindingInterceptor;
pub use stdlib::StdlibInterceptor;

use super::Interceptor;

/// Names of the built-in interceptors, as used in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterceptorKind {
    ImportAlias,
    SemanticBinding,
    ExplicitImport,
    DeclarationLookup,
    Stdlib,
}

#[allow(clippy::should_implement_trait)]
impl InterceptorKind {
    /// The default chain, in order.
    pub const DEFAULT_CHAIN: [InterceptorKind; 5] = [
        InterceptorKind::ImportAlias,
        InterceptorKind::SemanticBinding,
        InterceptorKind::ExplicitImport,
        InterceptorKind::DeclarationLookup,
        InterceptorKind::Stdlib,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImportAlias => "import_alias",
            Self::SemanticBinding => "semantic_binding",
            Self::ExplicitImport => "explicit_import",
            Self::DeclarationLookup => "declaration_lookup",
            Self::Stdlib => "stdlib",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "import_alias" => Some(Self::ImportAlias),
            "semantic_binding" => Some(Self::SemanticBinding),
            "explicit_import" => Some(Self::ExplicitImport),
            "declaration_lookup" => Some(Self::DeclarationLookup),
            "stdlib" => Some(Self::Stdlib),
            _ => None,
        }
    }

    /// Instantiates the interceptor.
    pub fn build(&self) -> Arc<dyn Interceptor> {
        match self {
            Self::ImportAlias => Arc::new(ImportAliasInterceptor),
            Self::SemanticBinding => Arc::new(SemanticBindingInterceptor),
            Self::ExplicitImport => Arc::new(ExplicitImportInterceptor),
            Self::DeclarationLookup => Arc::new(DeclarationLookupInterceptor),
            Self::Stdlib => Arc::new(StdlibInterceptor),
        }
    }
}
