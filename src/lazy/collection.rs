use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::DeferredValue;
use crate::errors::Result;

/// Priority tier of a collection source. When two sources supply equal
/// elements, the copy from the higher tier is the one kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// Source-level membership hint: returns `false` only when the source
/// certainly cannot contain the element.
type MembershipHint<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

struct Source<T> {
    priority: Priority,
    values: DeferredValue<Arc<Vec<T>>>,
    may_contain: Option<MembershipHint<T>>,
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        Self {
            priority: self.priority,
            values: self.values.clone(),
            may_contain: self.may_contain.clone(),
        }
    }
}

/// A set whose members come from several lazily-computed sources.
///
/// Each source is pulled at most once. Merging uses set semantics: equal
/// elements collapse, and the surviving copy is the one from the
/// highest-priority source (ties go to the source registered first). A
/// failing source fails every consumer that needs it.
pub struct LazyCollection<T> {
    /// Sorted by descending priority, stable within a tier.
    sources: Arc<[Source<T>]>,
    merged: DeferredValue<Arc<Vec<T>>>,
}

impl<T> LazyCollection<T>
where
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    pub fn builder() -> CollectionBuilder<T> {
        CollectionBuilder {
            sources: Vec::new(),
        }
    }

    /// A collection with no sources.
    pub fn empty() -> Self {
        Self::from_sources(Vec::new())
    }

    fn from_sources(mut sources: Vec<Source<T>>) -> Self {
        sources.sort_by(|a, b| b.priority.cmp(&a.priority));
        let sources: Arc<[Source<T>]> = sources.into();
        let pending = Arc::clone(&sources);
        let merged = DeferredValue::new(async move { merge(&pending).await });
        Self { sources, merged }
    }

    /// Pulls every source and returns the deduplicated members, ordered by
    /// source priority and then by the order each source produced them.
    pub async fn materialize(&self) -> Result<Arc<Vec<T>>> {
        self.merged.get().await
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.materialize().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.materialize().await?.is_empty())
    }

    /// Membership test. Sources whose hint rules the element out are never
    /// pulled, and the scan stops at the first source containing it.
    pub async fn contains(&self, value: &T) -> Result<bool> {
        if let Some(Ok(merged)) = self.merged.peek() {
            return Ok(merged.contains(value));
        }
        for source in self.sources.iter() {
            if let Some(hint) = &source.may_contain {
                if !(hint.as_ref())(value) {
                    continue;
                }
            }
            if source.values.get().await?.contains(value) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The first member matching `predicate`, in materialization order.
    /// Sources after the first match are not pulled.
    pub async fn first_or_null<P>(&self, predicate: P) -> Result<Option<T>>
    where
        P: Fn(&T) -> bool,
    {
        if let Some(Ok(merged)) = self.merged.peek() {
            return Ok(merged.iter().find(|v| predicate(*v)).cloned());
        }
        for source in self.sources.iter() {
            let values = source.values.get().await?;
            if let Some(found) = values.iter().find(|v| predicate(*v)) {
                return Ok(Some(found.clone()));
            }
        }
        Ok(None)
    }

    /// A lazy view keeping the elements `f` maps to `Some`. Sources keep
    /// their priorities and are shared with this collection.
    pub fn filter_map<U, F>(&self, f: F) -> LazyCollection<U>
    where
        U: Clone + Eq + Hash + Send + Sync + 'static,
        F: Fn(&T) -> Option<U> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let sources: Vec<Source<U>> = self
            .sources
            .iter()
            .map(|source| {
                let f = Arc::clone(&f);
                Source {
                    priority: source.priority,
                    values: source
                        .values
                        .map(move |values| Arc::new(values.iter().filter_map(|v| f(v)).collect::<Vec<U>>())),
                    may_contain: None,
                }
            })
            .collect();
        LazyCollection::from_sources(sources)
    }

    /// The members that convert into `U`, e.g. one variant of an enum.
    pub fn filter_is_instance<U>(&self) -> LazyCollection<U>
    where
        U: TryFrom<T> + Clone + Eq + Hash + Send + Sync + 'static,
    {
        self.filter_map(|v| U::try_from(v.clone()).ok())
    }

    /// The union of this collection and `other`.
    pub fn chain(&self, other: &LazyCollection<T>) -> LazyCollection<T> {
        let sources: Vec<Source<T>> = self
            .sources
            .iter()
            .chain(other.sources.iter())
            .cloned()
            .collect();
        LazyCollection::from_sources(sources)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// How many sources have been pulled so far.
    pub fn sources_started(&self) -> usize {
        self.sources.iter().filter(|s| s.values.is_started()).count()
    }
}

async fn merge<T>(sources: &[Source<T>]) -> Result<Arc<Vec<T>>>
where
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    for source in sources {
        source.values.start();
    }

    let mut seen: HashSet<T> = HashSet::new();
    let mut merged = Vec::new();
    for source in sources {
        let values = source.values.get().await?;
        for value in values.iter() {
            if seen.insert(value.clone()) {
                merged.push(value.clone());
            }
        }
    }
    tracing::trace!(sources = sources.len(), members = merged.len(), "merged lazy collection");
    Ok(Arc::new(merged))
}

impl<T> Clone for LazyCollection<T> {
    fn clone(&self) -> Self {
        Self {
            sources: Arc::clone(&self.sources),
            merged: self.merged.clone(),
        }
    }
}

impl<T> fmt::Debug for LazyCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCollection")
            .field("sources", &self.sources.len())
            .field("merged", &self.merged)
            .finish()
    }
}

/// Collects sources for a [`LazyCollection`].
pub struct CollectionBuilder<T> {
    sources: Vec<Source<T>>,
}

impl<T> CollectionBuilder<T>
where
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    /// Adds a source computed by `future` the first time it is needed.
    pub fn source<F>(self, priority: Priority, future: F) -> Self
    where
        F: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        self.deferred(priority, DeferredValue::new(async move { future.await.map(Arc::new) }), None)
    }

    /// Like [`source`](Self::source), with a hint that lets membership tests
    /// skip the source without pulling it.
    pub fn source_with_hint<F, H>(self, priority: Priority, hint: H, future: F) -> Self
    where
        F: Future<Output = Result<Vec<T>>> + Send + 'static,
        H: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let values = DeferredValue::new(async move { future.await.map(Arc::new) });
        self.deferred(priority, values, Some(Arc::new(hint)))
    }

    /// Adds an already-known set of values.
    pub fn values(self, priority: Priority, values: Vec<T>) -> Self {
        self.deferred(priority, DeferredValue::ready(Arc::new(values)), None)
    }

    /// Adds an existing deferred value as a source, sharing its memoization.
    pub fn deferred(
        mut self,
        priority: Priority,
        values: DeferredValue<Arc<Vec<T>>>,
        may_contain: Option<Arc<dyn Fn(&T) -> bool + Send + Sync>>,
    ) -> Self {
        self.sources.push(Source {
            priority,
            values,
            may_contain,
        });
        self
    }

    pub fn build(self) -> LazyCollection<T> {
        LazyCollection::from_sources(self.sources)
    }
}
