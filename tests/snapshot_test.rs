use std::fs;

use symres::config::ResolverConfig;
use symres::errors::SymresError;
use symres::names::{DeclaredName, Language, LanguageSet, ReferenceName};
use symres::resolution::Factory;
use symres::snapshot::*;
use tempfile::TempDir;

const APP: &str = r#"{
  "files": [
    {
      "path": "app/Main.kt",
      "package": "com.app",
      "language": "kotlin",
      "aliases": { "Req": "com.net.Request" },
      "imports": ["com.app.model.User"],
      "declarations": [{ "names": "Main" }],
      "references": ["Req.Builder", "User", "Main", "List", "Unknown"]
    },
    {
      "path": "app/model/User.kt",
      "package": "com.app.model",
      "declarations": [{ "names": "User" }, { "names": "User.Id", "languages": ["java", "kotlin"] }]
    },
    {
      "path": "net/Request.kt",
      "package": "com.net",
      "declarations": [{ "names": "Request" }, { "names": "Request.Builder" }]
    }
  ]
}"#;

fn write_snapshot(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, "app.symres.json", APP);
    let snapshot = Snapshot::load(&path).unwrap();

    assert_eq!(snapshot.files.len(), 3);
    assert_eq!(snapshot.files[0].language(), Language::Kotlin);
    assert_eq!(snapshot.files[1].language, None);
    assert_eq!(snapshot.files[1].declared_names().unwrap().len(), 2);
}

#[test]
fn test_load_reports_path_on_bad_json() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, "broken.symres.json", "{ files: ");
    match Snapshot::load(&path).unwrap_err() {
        SymresError::Snapshot { path: reported, .. } => assert!(reported.ends_with("broken.symres.json")),
        other => panic!("expected snapshot error, got {other:?}"),
    }
}

#[test]
fn test_discover_finds_nested_snapshots_and_skips_hidden_dirs() {
    let dir = TempDir::new().unwrap();
    write_snapshot(&dir, "b.symres.json", "{}");
    write_snapshot(&dir, "nested/a.symres.json", "{}");
    write_snapshot(&dir, ".symres/ignored.symres.json", "{}");
    write_snapshot(&dir, "notes.json", "{}");

    let found = Snapshot::discover(dir.path()).unwrap();
    let names: Vec<String> = found
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, vec!["b.symres.json", "nested/a.symres.json"]);

    let single = Snapshot::discover(&found[0]).unwrap();
    assert_eq!(single, vec![found[0].clone()]);
    assert!(Snapshot::discover(&dir.path().join("missing")).is_err());
}

#[test]
fn test_default_language_fills_missing_only() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, "app.symres.json", APP);
    let snapshot = Snapshot::load(&path).unwrap().with_default_language(Language::Java);
    assert_eq!(snapshot.files[0].language(), Language::Kotlin);
    assert_eq!(snapshot.files[1].language(), Language::Java);
}

#[tokio::test]
async fn test_invalid_declaration_is_rejected() {
    let snapshot: Snapshot = serde_json::from_str(
        r#"{ "files": [{ "path": "A.kt", "language": "kotlin", "declarations": [{ "names": "not valid" }] }] }"#,
    )
    .unwrap();
    let declarations = snapshot.declarations();
    assert_eq!(declarations.sources_started(), 0);
    assert!(declarations.materialize().await.unwrap_err().is_validation());
}

#[tokio::test]
async fn test_membership_parses_only_matching_packages() {
    let snapshot: Snapshot = serde_json::from_str(
        r#"{ "files": [
            { "path": "bad/A.kt", "package": "com.bad", "declarations": [{ "names": "not valid" }] },
            { "path": "good/B.kt", "package": "com.good", "declarations": [{ "names": "Widget" }] }
        ] }"#,
    )
    .unwrap();
    let declarations = snapshot.declarations();
    let widget = DeclaredName::parse("com.good", "Widget", LanguageSet::from(Language::Kotlin)).unwrap();

    assert!(declarations.contains(&widget).await.unwrap());
    assert_eq!(declarations.sources_started(), 1);
}

#[tokio::test]
async fn test_resolve_snapshot_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, "app.symres.json", APP);
    let snapshot = Snapshot::load(&path).unwrap();
    let config = ResolverConfig::default();
    let resolver = Factory::from_config(&config)
        .declarations(snapshot.declarations())
        .build();

    let results = snapshot.resolve_with(&resolver).await.unwrap();
    assert_eq!(results.len(), 3);

    let main = &results[0].summary;
    assert_eq!(main.total, 5);
    let resolved: Vec<(&str, &str)> = main
        .resolved
        .iter()
        .map(|r| (r.original.as_str(), r.resolved.as_str()))
        .collect();
    assert_eq!(
        resolved,
        vec![
            ("Req.Builder", "com.net.Request.Builder"),
            ("User", "com.app.model.User"),
            ("Main", "com.app.Main"),
            ("List", "kotlin.collections.List"),
        ]
    );
    assert_eq!(main.unresolved, vec![ReferenceName::new("Unknown", Language::Kotlin)]);
    assert_eq!(results[1].summary.total, 0);
}

#[tokio::test]
async fn test_declarations_hint_skips_other_packages() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, "app.symres.json", APP);
    let snapshot = Snapshot::load(&path).unwrap();
    let declarations = snapshot.declarations();

    let user = snapshot.files[1].declared_names().unwrap().remove(0);
    assert!(declarations.contains(&user).await.unwrap());
    assert_eq!(declarations.sources_started(), 1);
}
