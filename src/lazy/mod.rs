//! Lazy, shareable containers for expensive computations.
//!
//! [`DeferredValue`] memoizes one asynchronous result with single-flight
//! semantics. [`LazyCollection`] merges several prioritized, individually
//! memoized sources into one deduplicated set.

use std::future::Future;
use std::pin::Pin;

/// Deferred single-value computation.
pub mod deferred;

/// Multi-source lazy set.
pub mod collection;

pub use collection::{CollectionBuilder, LazyCollection, Priority};
pub use deferred::DeferredValue;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
