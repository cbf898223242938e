use super::super::{Chain, Interceptor, Resolution, ResolutionPacket};
use crate::errors::SymresError;
use crate::lazy::BoxFuture;
use crate::names::ReferenceName;
use crate::syntax::{BindingValue, SliceKey};

/// Asks the front-end's semantic binding for the target of the packet's
/// syntax node. Runs only when the packet carries both a binding handle and
/// a node. Binding failures are reported, never treated as "unresolved".
#[derive(Debug, Default, Clone, Copy)]
pub struct SemanticBindingInterceptor;

impl Interceptor for SemanticBindingInterceptor {
    fn name(&self) -> &'static str {
        "semantic_binding"
    }

    fn intercept<'a>(&'a self, packet: ResolutionPacket, chain: Chain<'a>) -> BoxFuture<'a, Resolution> {
        Box::pin(async move {
            let (Some(binding), Some(node)) = (packet.binding(), packet.node()) else {
                return chain.proceed(packet).await;
            };

            let value = binding
                .lookup(SliceKey::ReferenceTarget, &**node)
                .await
                .map_err(|e| match e {
                    SymresError::Binding { .. } => e,
                    other => SymresError::Binding {
                        message: other.to_string(),
                        file: packet.file().path().to_string(),
                        reference: packet.original().to_string(),
                    },
                })?;

            let resolved = match value {
                Some(BindingValue::QualifiedName(qualified)) => {
                    Some(ReferenceName::new(qualified, packet.language()))
                }
                Some(BindingValue::Declaration(declared)) => declared.to_reference(packet.language()),
                None => None,
            };

            match resolved {
                Some(reference) => Ok(Some(reference)),
                None => chain.proceed(packet).await,
            }
        })
    }
}
