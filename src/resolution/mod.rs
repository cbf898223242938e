/// Reference resolution engine.
///
/// Turns a raw reference found in a file into a fully-qualified
/// [`ReferenceName`](crate::names::ReferenceName) by running it through an
/// ordered chain of interceptors. Results are memoized per request in a
/// [`ResolutionCache`].
mod cache;
mod chain;
pub mod interceptors;
mod packet;
mod resolver;

pub use cache::{CacheKey, ResolutionCache};
pub use chain::{run_chain, Chain, Interceptor, Resolution};
pub use interceptors::InterceptorKind;
pub use packet::ResolutionPacket;
pub use resolver::{Factory, NameResolver, ResolutionSummary, ResolvedReference};
