//! Integration tests for the engine facade.
//!
//! The descriptor source is mocked to verify that every operation
//! fetches exactly once and that fetch failures are never masked.

use async_trait::async_trait;
use mockall::mock;
use plugin_config_core::traits::DescriptorSource;
use plugin_config_core::{ClassName, ConfigField, Descriptor, Error, PluginFamily, Result};
use plugin_config_engine::{CachingDescriptorSource, ConfigEngine};
use plugin_config_secrets::FingerprintLedger;
use serde_json::json;
use std::sync::Arc;

mock! {
    pub Source {}

    #[async_trait]
    impl DescriptorSource for Source {
        async fn descriptors(&self, family: &PluginFamily) -> Result<Vec<Descriptor>>;
    }
}

fn descriptors() -> Vec<Descriptor> {
    vec![Descriptor::new(
        "com.example.Basic",
        "Basic",
        vec![
            ConfigField::plain("host", true),
            ConfigField::concealed("password", true),
            ConfigField::composite(
                "auth",
                false,
                vec![
                    ConfigField::plain("user", true),
                    ConfigField::concealed("token", false),
                ],
            ),
        ],
    )]
}

fn source_fetching_once() -> MockSource {
    let mut source = MockSource::new();
    source
        .expect_descriptors()
        .withf(|family| family.as_str() == "siteAuthenticators")
        .times(1)
        .returning(|_| Ok(descriptors()));
    source
}

fn family() -> PluginFamily {
    PluginFamily::new("siteAuthenticators")
}

fn class() -> ClassName {
    ClassName::new("com.example.Basic")
}

/// Tests validation fetches descriptors exactly once
#[tokio::test]
async fn test_validate_fetches_once() {
    let engine = ConfigEngine::new(source_fetching_once());
    let report = engine
        .validate(&family(), &class(), &json!({"auth": {}}))
        .await
        .unwrap();
    assert_eq!(report.missing_paths(), ["host", "password", "auth.user"]);
}

/// Tests reconciliation fetches descriptors exactly once
#[tokio::test]
async fn test_reconcile_fetches_once() {
    let engine = ConfigEngine::new(source_fetching_once());
    let outcome = engine
        .reconcile(
            &family(),
            &class(),
            &json!({"password": "p", "auth": {"token": {"value": "t"}}}),
            &json!({
                "host": "h",
                "password": {"fingerprint": "f1"},
                "auth": {"user": "u", "token": {"fingerprint": "f2"}}
            }),
            &FingerprintLedger::new(),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome.document,
        json!({
            "host": "h",
            "password": {"value": "p"},
            "auth": {"user": "u", "token": {"value": "t"}}
        })
    );
    assert_eq!(outcome.fingerprints.len(), 2);
}

/// Tests fetch failures propagate instead of looking like an empty set
#[tokio::test]
async fn test_fetch_failure_propagates() {
    let mut source = MockSource::new();
    source.expect_descriptors().times(1).returning(|family| {
        Err(Error::DescriptorFetch {
            family: family.clone(),
            source: "connection reset".into(),
        })
    });

    let engine = ConfigEngine::new(source);
    let err = engine
        .reconcile(
            &family(),
            &class(),
            &json!({}),
            &json!({"password": {"fingerprint": "f1"}}),
            &FingerprintLedger::new(),
        )
        .await
        .unwrap_err();

    assert!(err.is_fetch_error());
}

/// Tests the cache turns repeated operations into one fetch
#[tokio::test]
async fn test_cached_source_fetches_once_across_operations() {
    let cached = CachingDescriptorSource::with_capacity(source_fetching_once(), 8).unwrap();
    let engine = ConfigEngine::new(cached);

    engine
        .check(&family(), &class(), &json!({"host": "h", "password": "p"}))
        .await
        .unwrap();
    let redacted = engine
        .redact(&family(), &class(), &json!({"password": "p"}))
        .await
        .unwrap();

    assert_eq!(redacted, json!({"password": "[REDACTED]"}));
    let stats = engine.source().stats().await;
    assert_eq!((stats.hits, stats.misses), (1, 1));
}

/// Tests the engine works behind a shared source
#[tokio::test]
async fn test_shared_source() {
    let source: Arc<dyn DescriptorSource> = Arc::new(source_fetching_once());
    let engine = ConfigEngine::new(source);

    let classes = engine.classes(&family()).await.unwrap();
    assert_eq!(classes, [class()]);
}

/// Tests two read cycles detect an out-of-band rotation
#[tokio::test]
async fn test_read_cycles_detect_rotation() {
    let mut source = MockSource::new();
    source
        .expect_descriptors()
        .times(2)
        .returning(|_| Ok(descriptors()));
    let engine = ConfigEngine::new(source);

    let first = engine
        .reconcile(
            &family(),
            &class(),
            &json!({"host": "h", "password": "secret1"}),
            &json!({"host": "h", "password": {"fingerprint": "abc"}}),
            &FingerprintLedger::new(),
        )
        .await
        .unwrap();
    assert!(!first.has_rotation());

    let second = engine
        .reconcile(
            &family(),
            &class(),
            &first.document,
            &json!({"host": "h", "password": {"fingerprint": "xyz"}}),
            &first.fingerprints,
        )
        .await
        .unwrap();

    assert!(second.has_rotation());
    assert_eq!(second.document, json!({"host": "h", "password": {}}));
}
