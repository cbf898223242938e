use super::super::{Chain, Interceptor, Resolution, ResolutionPacket};
use crate::lazy::BoxFuture;
use crate::names::ReferenceName;

/// Falls back to the standard-library lookup carried by the packet. Placed
/// last, it only sees references no earlier stage resolved.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdlibInterceptor;

impl Interceptor for StdlibInterceptor {
    fn name(&self) -> &'static str {
        "stdlib"
    }

    fn intercept<'a>(&'a self, packet: ResolutionPacket, chain: Chain<'a>) -> BoxFuture<'a, Resolution> {
        Box::pin(async move {
            match packet.stdlib().lookup(packet.raw()) {
                Some(qualified) => Ok(Some(ReferenceName::new(qualified, packet.language()))),
                None => chain.proceed(packet).await,
            }
        })
    }
}
