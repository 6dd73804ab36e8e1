mod common;

use bytes::Bytes;
use common::{RecordingReporter, artifact, deployer, registry, seeded_store, upload_config};
use kvdeploy_core::config::RegistryConfig;
use kvdeploy_registry::{Deployer, RevisionRegistry};
use kvdeploy_storage::KvStore;
use std::sync::Arc;

#[tokio::test]
async fn upload_links_self_alias_then_configured_aliases() {
    let store = seeded_store(&[]);
    let file = artifact("bar");
    let mut config = upload_config("1234", &file);
    config.aliases = vec!["my-branch".to_string(), "staging".to_string()];

    deployer(store.clone(), RecordingReporter::new())
        .upload(&config)
        .await
        .unwrap();

    assert_eq!(
        store.get("foo/revisions/1234/aliases").await.unwrap(),
        Some(Bytes::from_static(b"1234,my-branch,staging"))
    );
    for name in ["1234", "my-branch", "staging"] {
        assert_eq!(
            store.get(&format!("foo/aliases/{name}")).await.unwrap(),
            Some(Bytes::from_static(b"1234"))
        );
    }
}

#[tokio::test]
async fn alias_moves_between_revisions() {
    let store = seeded_store(&[]);
    let deployer = deployer(store.clone(), RecordingReporter::new());
    let file = artifact("bar");

    let mut first = upload_config("1234", &file);
    first.aliases = vec!["my-branch".to_string()];
    deployer.upload(&first).await.unwrap();

    let mut second = upload_config("9999", &file);
    second.aliases = vec!["my-branch".to_string()];
    deployer.upload(&second).await.unwrap();

    assert_eq!(
        store.get("foo/aliases/my-branch").await.unwrap(),
        Some(Bytes::from_static(b"9999"))
    );
    assert_eq!(
        store.get("foo/revisions/1234/aliases").await.unwrap(),
        Some(Bytes::from_static(b"1234"))
    );
    assert_eq!(
        store.get("foo/revisions/9999/aliases").await.unwrap(),
        Some(Bytes::from_static(b"9999,my-branch"))
    );
}

#[tokio::test]
async fn update_alias_is_idempotent() {
    let store = seeded_store(&[]);
    let registry = registry(store.clone());

    registry.update_alias("1234", "my-branch").await.unwrap();
    let once = store.snapshot().await;
    registry.update_alias("1234", "my-branch").await.unwrap();
    let twice = store.snapshot().await;

    assert_eq!(once, twice);
}

#[tokio::test]
async fn moving_one_of_several_aliases_keeps_the_rest() {
    let store = seeded_store(&[
        ("foo/aliases/1234", "1234"),
        ("foo/aliases/my-branch", "1234"),
        ("foo/revisions/1234/aliases", "1234,my-branch"),
    ]);
    let registry = registry(store.clone());

    registry.update_alias("9999", "my-branch").await.unwrap();

    assert_eq!(
        registry.revision_aliases("1234").await.unwrap(),
        vec!["1234"]
    );
    assert_eq!(
        registry.revision_aliases("9999").await.unwrap(),
        vec!["my-branch"]
    );
    assert_eq!(
        registry.resolve_alias("1234").await.unwrap().as_deref(),
        Some("1234")
    );
}

#[tokio::test]
async fn deleting_revision_removes_aliases_that_point_at_it() {
    let store = seeded_store(&[
        ("foo/revisions/1234", "bar"),
        ("foo/revisions/1234/aliases", "1234,my-branch"),
        ("foo/aliases/1234", "1234"),
        ("foo/aliases/my-branch", "9999"),
        ("foo/revisions/12345", "sibling"),
    ]);
    let registry = registry(store.clone());

    registry.delete_revision("1234").await.unwrap();

    assert!(store.get("foo/aliases/1234").await.unwrap().is_none());
    assert_eq!(
        store.get("foo/aliases/my-branch").await.unwrap(),
        Some(Bytes::from_static(b"9999"))
    );
    assert!(store.keys("foo/revisions/1234/").await.unwrap().is_empty());
    assert!(store.get("foo/revisions/1234").await.unwrap().is_none());
    assert_eq!(
        store.get("foo/revisions/12345").await.unwrap(),
        Some(Bytes::from_static(b"sibling"))
    );
}

#[tokio::test]
async fn disabled_aliases_write_no_alias_keys() {
    let store = seeded_store(&[]);
    let mut config = RegistryConfig::for_namespace("foo");
    config.aliases_enabled = false;
    let registry = RevisionRegistry::new(store.clone(), &config).unwrap();
    let file = artifact("bar");
    let mut upload = upload_config("1234", &file);
    upload.aliases = vec!["my-branch".to_string()];

    Deployer::new(registry)
        .with_reporter(Arc::new(RecordingReporter::default()))
        .upload(&upload)
        .await
        .unwrap();

    assert!(store.keys("foo/aliases").await.unwrap().is_empty());
    assert!(
        store
            .get("foo/revisions/1234/aliases")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn configured_alias_never_steals_another_revisions_self_alias() {
    let store = seeded_store(&[]);
    let deployer = deployer(store.clone(), RecordingReporter::new());
    let file = artifact("bar");

    deployer.upload(&upload_config("aaa", &file)).await.unwrap();

    let mut second = upload_config("1234", &file);
    second.aliases = vec!["aaa".to_string(), "my-branch".to_string()];
    deployer.upload(&second).await.unwrap();

    assert_eq!(
        store.get("foo/aliases/aaa").await.unwrap(),
        Some(Bytes::from_static(b"aaa"))
    );
    assert_eq!(
        store.get("foo/revisions/aaa/aliases").await.unwrap(),
        Some(Bytes::from_static(b"aaa"))
    );
    assert_eq!(
        store.get("foo/revisions/1234/aliases").await.unwrap(),
        Some(Bytes::from_static(b"1234,my-branch"))
    );
    for revision in ["aaa", "1234"] {
        assert_eq!(
            deployer
                .registry()
                .resolve_alias(revision)
                .await
                .unwrap()
                .as_deref(),
            Some(revision)
        );
    }
}
