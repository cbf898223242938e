use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use symres::errors::{Result, SymresError};
use symres::lazy::{BoxFuture, LazyCollection, Priority};
use symres::names::{DeclaredName, Language, LanguageSet, PackageName, ReferenceName, SimpleName};
use symres::resolution::{
    Chain, Factory, Interceptor, InterceptorKind, NameResolver, Resolution, ResolutionPacket,
};
use symres::syntax::{
    BindingValue, FileContext, NodeId, SemanticBinding, SliceKey, SourceFile, StdlibLookup,
    SyntaxNode,
};

// ---------------------------------------------------------------------------
// Test interceptors and front-end doubles
// ---------------------------------------------------------------------------

/// Counts invocations and answers after a short delay.
struct Counting {
    calls: AtomicUsize,
}

impl Interceptor for Counting {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn intercept<'a>(&'a self, packet: ResolutionPacket, _chain: Chain<'a>) -> BoxFuture<'a, Resolution> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(25)).await;
            Resolution::Ok(Some(packet.reference().resolved("com.counted.Foo")))
        })
    }
}

/// Records the reference text it sees, then proceeds.
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<String>>,
}

impl Interceptor for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn intercept<'a>(&'a self, packet: ResolutionPacket, chain: Chain<'a>) -> BoxFuture<'a, Resolution> {
        Box::pin(async move {
            self.seen.lock().unwrap().push(packet.raw().to_string());
            chain.proceed(packet).await
        })
    }
}

/// Appends a fixed segment to the reference, then proceeds.
struct AppendSegment(&'static str);

impl Interceptor for AppendSegment {
    fn name(&self) -> &'static str {
        "append_segment"
    }

    fn intercept<'a>(&'a self, packet: ResolutionPacket, chain: Chain<'a>) -> BoxFuture<'a, Resolution> {
        Box::pin(async move {
            let segment = SimpleName::new(self.0)?;
            let rewritten = packet.reference().append(&segment);
            chain.proceed(packet.with_reference(rewritten)).await
        })
    }
}

/// Answers with whatever reference reaches it.
struct Echo;

impl Interceptor for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn intercept<'a>(&'a self, packet: ResolutionPacket, _chain: Chain<'a>) -> BoxFuture<'a, Resolution> {
        Box::pin(async move { Resolution::Ok(Some(packet.reference().clone())) })
    }
}

struct Leaf {
    text: String,
}

impl SyntaxNode for Leaf {
    fn id(&self) -> NodeId {
        NodeId(7)
    }

    fn children(&self) -> Vec<Arc<dyn SyntaxNode>> {
        Vec::new()
    }

    fn text(&self) -> &str {
        &self.text
    }
}

fn leaf(text: &str) -> Arc<dyn SyntaxNode> {
    Arc::new(Leaf {
        text: text.to_string(),
    })
}

enum FakeBinding {
    Fails,
    Answers(BindingValue),
}

impl SemanticBinding for FakeBinding {
    fn lookup<'a>(
        &'a self,
        key: SliceKey,
        _node: &'a dyn SyntaxNode,
    ) -> BoxFuture<'a, Result<Option<BindingValue>>> {
        Box::pin(async move {
            assert_eq!(key, SliceKey::ReferenceTarget);
            match self {
                FakeBinding::Fails => Err(SymresError::computation("binding context crashed")),
                FakeBinding::Answers(value) => Ok(Some(value.clone())),
            }
        })
    }
}

fn kotlin_file(package: &str) -> Arc<dyn SourceFile> {
    FileContext::new("src/Main.kt", PackageName::from(package), Language::Kotlin).shared()
}

fn stdlib(pairs: &[(&str, &str)]) -> StdlibLookup {
    let table: BTreeMap<String, String> = pairs
        .iter()
        .map(|(short, qualified)| (short.to_string(), qualified.to_string()))
        .collect();
    StdlibLookup::from_table(table)
}

// ---------------------------------------------------------------------------
// Chain mechanics
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_identical_requests_run_chain_once() {
    let counting = Arc::new(Counting {
        calls: AtomicUsize::new(0),
    });
    let resolver = Arc::new(
        Factory::new()
            .shared_interceptor(Arc::clone(&counting) as Arc<dyn Interceptor>)
            .build(),
    );
    let file = kotlin_file("com.app");

    let mut handles = Vec::new();
    for _ in 0..16 {
        let resolver = Arc::clone(&resolver);
        let file = Arc::clone(&file);
        handles.push(tokio::spawn(async move {
            resolver.resolve(&file, "Foo", Language::Kotlin).await
        }));
    }
    for handle in handles {
        let resolved = handle.await.unwrap().unwrap().unwrap();
        assert_eq!(resolved.as_str(), "com.counted.Foo");
    }
    assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    assert_eq!(resolver.cache().unwrap().len(), 1);
}

#[tokio::test]
async fn test_uncached_resolver_reruns_chain() {
    let counting = Arc::new(Counting {
        calls: AtomicUsize::new(0),
    });
    let resolver = Factory::new()
        .shared_interceptor(Arc::clone(&counting) as Arc<dyn Interceptor>)
        .without_cache()
        .build();
    let file = kotlin_file("com.app");

    resolver.resolve(&file, "Foo", Language::Kotlin).await.unwrap();
    resolver.resolve(&file, "Foo", Language::Kotlin).await.unwrap();
    assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
    assert!(resolver.cache().is_none());
}

#[tokio::test]
async fn test_interceptor_order_is_registration_order() {
    let file = kotlin_file("com.app");

    let ab = NameResolver::factory()
        .interceptor(AppendSegment("A"))
        .interceptor(AppendSegment("B"))
        .interceptor(Echo)
        .build();
    let ba = NameResolver::factory()
        .interceptor(AppendSegment("B"))
        .interceptor(AppendSegment("A"))
        .interceptor(Echo)
        .build();

    for _ in 0..3 {
        let first = ab.resolve(&file, "x", Language::Kotlin).await.unwrap().unwrap();
        let second = ba.resolve(&file, "x", Language::Kotlin).await.unwrap().unwrap();
        assert_eq!(first.as_str(), "x.A.B");
        assert_eq!(second.as_str(), "x.B.A");
    }
    assert_eq!(ab.interceptor_names(), vec!["append_segment", "append_segment", "echo"]);
}

#[tokio::test]
async fn test_exhausted_chain_is_unresolved() {
    let resolver = Factory::with_defaults().build();
    let file = kotlin_file("com.app");
    let result = resolver.resolve(&file, "Nowhere", Language::Kotlin).await.unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Built-in interceptors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_import_alias_rewrites_before_later_stages() {
    let recorder = Arc::new(Recorder::default());
    let resolver = Factory::new()
        .kinds(&[InterceptorKind::ImportAlias])
        .shared_interceptor(Arc::clone(&recorder) as Arc<dyn Interceptor>)
        .build();
    let file = FileContext::new("src/Main.kt", PackageName::from("com.app"), Language::Kotlin)
        .with_alias("Foo", "com.bar.Foo")
        .shared();

    let result = resolver.resolve(&file, "Foo.Baz", Language::Kotlin).await.unwrap();
    assert!(result.is_none());
    resolver.resolve(&file, "Other", Language::Kotlin).await.unwrap();

    let seen = recorder.seen.lock().unwrap().clone();
    assert_eq!(seen, vec!["com.bar.Foo.Baz".to_string(), "Other".to_string()]);
}

#[tokio::test]
async fn test_stdlib_fallback() {
    let resolver = Factory::with_defaults()
        .stdlib(stdlib(&[("List", "std.collections.List")]))
        .build();
    let file = kotlin_file("com.app");

    let resolved = resolver.resolve(&file, "List", Language::Kotlin).await.unwrap().unwrap();
    assert_eq!(resolved.as_str(), "std.collections.List");
    assert_eq!(resolved.language(), Language::Kotlin);
}

#[tokio::test]
async fn test_explicit_import_resolves_first_segment() {
    let resolver = Factory::with_defaults().build();
    let file = FileContext::new("src/Main.kt", PackageName::from("com.app"), Language::Kotlin)
        .with_import("com.foo.*")
        .with_import("com.foo.Bar")
        .shared();

    let resolved = resolver.resolve(&file, "Bar.Inner", Language::Kotlin).await.unwrap().unwrap();
    assert_eq!(resolved.as_str(), "com.foo.Bar.Inner");
}

#[tokio::test]
async fn test_declaration_lookup_honours_package_and_visibility() {
    let user = DeclaredName::parse("com.app.model", "User", LanguageSet::from(Language::Kotlin)).unwrap();
    let declarations = LazyCollection::builder()
        .values(Priority::Normal, vec![user])
        .build();
    let resolver = Factory::with_defaults().declarations(declarations).build();
    let file = kotlin_file("com.app.model");

    let relative = resolver.resolve(&file, "User", Language::Kotlin).await.unwrap().unwrap();
    assert_eq!(relative.as_str(), "com.app.model.User");

    let qualified = resolver
        .resolve(&file, "com.app.model.User", Language::Kotlin)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(qualified, relative);

    let from_java = resolver.resolve(&file, "User", Language::Java).await.unwrap();
    assert!(from_java.is_none());
}

#[tokio::test]
async fn test_semantic_binding_answer_wins() {
    let target = DeclaredName::parse("com.lib", "Widget", LanguageSet::all()).unwrap();
    let resolver = Factory::with_defaults()
        .binding(Arc::new(FakeBinding::Answers(BindingValue::Declaration(target))))
        .stdlib(stdlib(&[("Widget", "std.Widget")]))
        .build();
    let file = kotlin_file("com.app");

    let resolved = resolver
        .resolve_node(&file, &leaf("Widget"), Language::Java)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved, ReferenceName::new("com.lib.Widget", Language::Java));

    // Without a node the binding stage is skipped.
    let fallback = resolver.resolve(&file, "Widget", Language::Java).await.unwrap().unwrap();
    assert_eq!(fallback.as_str(), "std.Widget");
}

#[tokio::test]
async fn test_cached_text_answer_does_not_shadow_node_request() {
    let target = DeclaredName::parse("com.lib", "Widget", LanguageSet::all()).unwrap();
    let resolver = Factory::with_defaults()
        .binding(Arc::new(FakeBinding::Answers(BindingValue::Declaration(target))))
        .stdlib(stdlib(&[("Widget", "std.Widget")]))
        .build();
    let file = kotlin_file("com.app");

    let by_text = resolver.resolve(&file, "Widget", Language::Kotlin).await.unwrap().unwrap();
    assert_eq!(by_text.as_str(), "std.Widget");

    let by_node = resolver
        .resolve_node(&file, &leaf("Widget"), Language::Kotlin)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_node.as_str(), "com.lib.Widget");

    let again = resolver.resolve(&file, "Widget", Language::Kotlin).await.unwrap().unwrap();
    assert_eq!(again.as_str(), "std.Widget");
    assert_eq!(resolver.cache().unwrap().len(), 2);
}

#[tokio::test]
async fn test_binding_failure_is_an_error_not_unresolved() {
    let resolver = Factory::with_defaults()
        .binding(Arc::new(FakeBinding::Fails))
        .stdlib(stdlib(&[("Widget", "std.Widget")]))
        .build();
    let file = kotlin_file("com.app");

    let err = resolver
        .resolve_node(&file, &leaf("Widget"), Language::Kotlin)
        .await
        .unwrap_err();
    match err {
        SymresError::Binding { file, reference, .. } => {
            assert_eq!(file, "src/Main.kt");
            assert_eq!(reference, "Widget");
        }
        other => panic!("expected binding error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_resolve_all_summarizes_batch() {
    let resolver = Factory::with_defaults()
        .stdlib(stdlib(&[("String", "kotlin.String")]))
        .build();
    let file = FileContext::new("src/Main.kt", PackageName::from("com.app"), Language::Kotlin)
        .with_import("com.net.Request")
        .shared();
    let references = vec![
        ReferenceName::new("String", Language::Kotlin),
        ReferenceName::new("Request", Language::Kotlin),
        ReferenceName::new("Missing", Language::Kotlin),
    ];

    let summary = resolver.resolve_all(&file, &references).await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.resolved.len(), 2);
    assert_eq!(summary.resolved[1].resolved.as_str(), "com.net.Request");
    assert_eq!(summary.unresolved, vec![ReferenceName::new("Missing", Language::Kotlin)]);
}
