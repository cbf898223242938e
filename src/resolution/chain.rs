use std::sync::Arc;

use super::ResolutionPacket;
use crate::errors::Result;
use crate::lazy::BoxFuture;
use crate::names::ReferenceName;

/// Outcome of resolving a packet: `Ok(None)` means "unknown symbol".
pub type Resolution = Result<Option<ReferenceName>>;

/// One stage of the resolution pipeline.
///
/// An interceptor may answer directly, call [`Chain::proceed`] with the same
/// or a rewritten packet, or proceed and post-process what comes back.
pub trait Interceptor: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn intercept<'a>(&'a self, packet: ResolutionPacket, chain: Chain<'a>) -> BoxFuture<'a, Resolution>;
}

/// The interceptors that have not yet run, addressed by index.
///
/// [`proceed`](Self::proceed) consumes the chain, so an interceptor hands a
/// packet downstream at most once:
///
/// ```compile_fail
/// use symres::resolution::{Chain, ResolutionPacket};
///
/// fn proceed_twice(chain: Chain<'_>, packet: ResolutionPacket) {
///     let _first = chain.proceed(packet.clone());
///     let _second = chain.proceed(packet);
/// }
/// ```
pub struct Chain<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    index: usize,
}

impl<'a> Chain<'a> {
    /// A chain positioned before the first interceptor.
    pub fn new(interceptors: &'a [Arc<dyn Interceptor>]) -> Self {
        Self {
            interceptors,
            index: 0,
        }
    }

    /// Hands `packet` to the next interceptor. An exhausted chain resolves
    /// to `None`.
    pub fn proceed(self, packet: ResolutionPacket) -> BoxFuture<'a, Resolution> {
        match self.interceptors.get(self.index) {
            Some(interceptor) => {
                tracing::trace!(
                    interceptor = interceptor.name(),
                    position = self.index,
                    reference = packet.raw(),
                    "intercepting"
                );
                let next = Chain {
                    interceptors: self.interceptors,
                    index: self.index + 1,
                };
                interceptor.intercept(packet, next)
            }
            None => Box::pin(async { Resolution::Ok(None) }),
        }
    }

    /// Position of the next interceptor.
    pub fn position(&self) -> usize {
        self.index
    }

    /// How many interceptors are left to run.
    pub fn remaining(&self) -> usize {
        self.interceptors.len().saturating_sub(self.index)
    }
}

/// Runs `packet` through `interceptors` from the start.
pub async fn run_chain(interceptors: &[Arc<dyn Interceptor>], packet: ResolutionPacket) -> Resolution {
    let original = packet.original().to_string();
    let result = Chain::new(interceptors).proceed(packet).await;
    match &result {
        Ok(Some(resolved)) => tracing::debug!(reference = %original, resolved = resolved.as_str(), "resolved"),
        Ok(None) => tracing::debug!(reference = %original, "unresolved"),
        Err(e) => tracing::debug!(reference = %original, error = %e, "resolution failed"),
    }
    result
}
