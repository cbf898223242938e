use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::chain::Resolution;
use crate::lazy::{BoxFuture, DeferredValue};
use crate::names::{Language, ReferenceName};
use crate::syntax::{FileId, NodeId};

/// Identifies one resolution request.
///
/// A request made from a syntax node runs the semantic-binding stage and a
/// text-only request does not, so the node is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub file: FileId,
    pub raw: String,
    pub language: Language,
    pub node: Option<NodeId>,
}

impl CacheKey {
    pub fn new(file: FileId, raw: impl Into<String>, language: Language) -> Self {
        Self {
            file,
            raw: raw.into(),
            language,
            node: None,
        }
    }

    pub fn with_node(mut self, node: Option<NodeId>) -> Self {
        self.node = node;
        self
    }
}

/// Memoized resolution results, one [`DeferredValue`] per request key.
///
/// The first request for a key starts the work and every concurrent or
/// later request for it awaits that same computation. Failures are cached
/// like successes. Entries live until [`invalidate_file`](Self::invalidate_file)
/// or [`clear`](Self::clear), or until the cache is dropped.
#[derive(Default)]
pub struct ResolutionCache {
    entries: Mutex<HashMap<CacheKey, DeferredValue<Option<ReferenceName>>>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached outcome for `key`, running `compute` only if no
    /// entry exists yet.
    pub async fn get_or_resolve<F>(&self, key: CacheKey, compute: F) -> Resolution
    where
        F: FnOnce() -> BoxFuture<'static, Resolution>,
    {
        let deferred = {
            let mut entries = self.lock();
            match entries.entry(key) {
                Entry::Occupied(entry) => {
                    tracing::trace!(reference = %entry.key().raw, "resolution cache hit");
                    entry.get().clone()
                }
                Entry::Vacant(entry) => {
                    tracing::trace!(reference = %entry.key().raw, "resolution cache miss");
                    entry.insert(DeferredValue::new(compute())).clone()
                }
            }
        };
        deferred.get().await
    }

    /// The settled outcome for `key`, if any.
    pub fn peek(&self, key: &CacheKey) -> Option<Resolution> {
        self.lock().get(key).and_then(DeferredValue::peek)
    }

    /// Drops every entry belonging to `file`. Returns how many were removed.
    pub fn invalidate_file(&self, file: &FileId) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| &key.file != file);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, DeferredValue<Option<ReferenceName>>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SymresError;

    fn key(path: &str, raw: &str) -> CacheKey {
        CacheKey::new(FileId::for_path(path), raw, Language::Kotlin)
    }

    #[tokio::test]
    async fn second_request_reuses_entry() {
        let cache = ResolutionCache::new();
        let first = cache
            .get_or_resolve(key("A.kt", "List"), || {
                Box::pin(async { Resolution::Ok(Some(ReferenceName::new("a.List", Language::Kotlin))) })
            })
            .await
            .unwrap();
        let second = cache
            .get_or_resolve(key("A.kt", "List"), || Box::pin(async { Resolution::Ok(None) }))
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn failures_are_cached() {
        let cache = ResolutionCache::new();
        let err = cache
            .get_or_resolve(key("A.kt", "X"), || {
                Box::pin(async { Resolution::Err(SymresError::computation("binding crashed")) })
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SymresError::Computation { .. }));
        assert!(cache.peek(&key("A.kt", "X")).unwrap().is_err());
    }

    #[tokio::test]
    async fn node_requests_do_not_share_text_entries() {
        let cache = ResolutionCache::new();
        cache
            .get_or_resolve(key("A.kt", "Widget"), || {
                Box::pin(async { Resolution::Ok(Some(ReferenceName::new("std.Widget", Language::Kotlin))) })
            })
            .await
            .unwrap();
        let from_node = cache
            .get_or_resolve(key("A.kt", "Widget").with_node(Some(NodeId(3))), || {
                Box::pin(async { Resolution::Ok(Some(ReferenceName::new("com.lib.Widget", Language::Kotlin))) })
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(from_node.as_str(), "com.lib.Widget");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.invalidate_file(&FileId::for_path("A.kt")), 2);
    }

    #[tokio::test]
    async fn invalidate_only_touches_one_file() {
        let cache = ResolutionCache::new();
        for (path, raw) in [("A.kt", "x"), ("A.kt", "y"), ("B.kt", "x")] {
            cache
                .get_or_resolve(key(path, raw), || Box::pin(async { Resolution::Ok(None) }))
                .await
                .unwrap();
        }
        assert_eq!(cache.invalidate_file(&FileId::for_path("A.kt")), 2);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
