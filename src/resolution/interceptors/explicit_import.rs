use super::super::{Chain, Interceptor, Resolution, ResolutionPacket};
use crate::lazy::BoxFuture;
use crate::names::SEPARATOR;

/// Resolves a reference whose first segment is the simple name of a
/// single-name import: with `import com.foo.Bar`, `Bar.Inner` resolves to
/// `com.foo.Bar.Inner`. Wildcard imports are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExplicitImportInterceptor;

impl Interceptor for ExplicitImportInterceptor {
    fn name(&self) -> &'static str {
        "explicit_import"
    }

    fn intercept<'a>(&'a self, packet: ResolutionPacket, chain: Chain<'a>) -> BoxFuture<'a, Resolution> {
        Box::pin(async move {
            let resolved = packet.reference().first_segment().and_then(|first| {
                packet
                    .file()
                    .imports()
                    .iter()
                    .find(|import| imported_name(import) == Some(first))
                    .map(|import| packet.reference().replace_first_segment(import))
            });

            match resolved {
                Some(reference) => Ok(Some(reference)),
                None => chain.proceed(packet).await,
            }
        })
    }
}

/// `Bar` for `com.foo.Bar`; `None` for `com.foo.*`.
fn imported_name(import: &str) -> Option<&str> {
    let last = import.rsplit(SEPARATOR).next()?;
    (last != "*" && !last.is_empty()).then_some(last)
}
