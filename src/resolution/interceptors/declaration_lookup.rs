use super::super::{Chain, Interceptor, Resolution, ResolutionPacket};
use crate::lazy::BoxFuture;
use crate::names::ReferenceName;

/// Resolves against the declaration collection carried by the packet: first
/// the reference as already fully qualified, then relative to the file's
/// own package. A declaration only matches when it is visible from the
/// reference's language.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclarationLookupInterceptor;

impl Interceptor for DeclarationLookupInterceptor {
    fn name(&self) -> &'static str {
        "declaration_lookup"
    }

    fn intercept<'a>(&'a self, packet: ResolutionPacket, chain: Chain<'a>) -> BoxFuture<'a, Resolution> {
        Box::pin(async move {
            let Some(declarations) = packet.declarations() else {
                return chain.proceed(packet).await;
            };

            let mut candidates = vec![packet.reference().clone()];
            let package = packet.file().package();
            if !package.is_default() {
                let relative = package.append(&packet.reference().segments());
                candidates.push(ReferenceName::new(relative, packet.language()));
            }

            for candidate in candidates {
                if declarations.first_or_null(|d| *d == candidate).await?.is_some() {
                    return Ok(Some(candidate));
                }
            }
            chain.proceed(packet).await
        })
    }
}
