use super::super::{Chain, Interceptor, Resolution, ResolutionPacket};
use crate::lazy::BoxFuture;

/// Expands an import alias used as the first segment of a reference:
/// with `import com.bar.Foo as Foo`, `Foo.Baz` continues down the chain as
/// `com.bar.Foo.Baz`. Packets without a matching alias pass through as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportAliasInterceptor;

impl Interceptor for ImportAliasInterceptor {
    fn name(&self) -> &'static str {
        "import_alias"
    }

    fn intercept<'a>(&'a self, packet: ResolutionPacket, chain: Chain<'a>) -> BoxFuture<'a, Resolution> {
        Box::pin(async move {
            let rewritten = packet.file().import_aliases().and_then(|aliases| {
                let first = packet.reference().first_segment()?;
                let target = aliases.get(first)?;
                Some(packet.reference().replace_first_segment(target))
            });

            match rewritten {
                Some(reference) => {
                    tracing::trace!(from = packet.raw(), to = reference.as_str(), "expanded import alias");
                    chain.proceed(packet.with_reference(reference)).await
                }
                None => chain.proceed(packet).await,
            }
        })
    }
}
