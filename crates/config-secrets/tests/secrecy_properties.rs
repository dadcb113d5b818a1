//! Property-based tests for secret reconciliation.
//!
//! These tests verify properties that must always hold:
//! - Server plaintext never reaches the reconciled document
//! - Plain fields equal the server's values exactly
//! - Reconciling against itself never reports drift
//! - Finalized documents never carry fingerprints

use plugin_config_core::{ConfigField, Descriptor, FieldPath};
use plugin_config_secrets::{
    FingerprintLedger, ReconcileOptions, reconcile, reconcile_with_ledger, redact,
};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z0-9]{0,12}".prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        Just(Value::Null),
    ]
}

/// Flags per field: `true` for concealed, `false` for plain.
fn kinds_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 1..8)
}

fn build_descriptor(kinds: &[bool]) -> Descriptor {
    let fields = kinds
        .iter()
        .enumerate()
        .map(|(i, concealed)| {
            if *concealed {
                ConfigField::concealed(format!("f{i}"), true)
            } else {
                ConfigField::plain(format!("f{i}"), true)
            }
        })
        .collect();
    Descriptor::new("Generated", "Generated", fields)
}

/// Server document: plain fields get `value`, concealed fields get a
/// wrapped form leaking `SERVER-PLAINTEXT` next to a fingerprint.
fn server_document(kinds: &[bool], value: &Value) -> Value {
    let members: Map<String, Value> = kinds
        .iter()
        .enumerate()
        .map(|(i, concealed)| {
            let field_value = if *concealed {
                json!({"value": "SERVER-PLAINTEXT", "fingerprint": format!("fp{i}")})
            } else {
                value.clone()
            };
            (format!("f{i}"), field_value)
        })
        .collect();
    Value::Object(members)
}

fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(text) => text.contains(needle),
        Value::Array(items) => items.iter().any(|item| contains_text(item, needle)),
        Value::Object(members) => members.values().any(|item| contains_text(item, needle)),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

fn contains_key(value: &Value, key: &str) -> bool {
    match value {
        Value::Object(members) => {
            members.contains_key(key) || members.values().any(|item| contains_key(item, key))
        }
        Value::Array(items) => items.iter().any(|item| contains_key(item, key)),
        _ => false,
    }
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    /// Property: server plaintext never appears in the intermediate or final document
    #[test]
    fn prop_server_plaintext_never_copied(kinds in kinds_strategy(), value in scalar_strategy()) {
        let descriptor = build_descriptor(&kinds);
        let server = server_document(&kinds, &value);

        let reconciled = reconcile(&descriptor, &json!({}), &server);
        prop_assert!(!contains_text(&reconciled.document, "SERVER-PLAINTEXT"));

        let outcome = reconciled.finalize(&FingerprintLedger::new(), &ReconcileOptions::default());
        prop_assert!(!contains_text(&outcome.document, "SERVER-PLAINTEXT"));
    }

    /// Property: plain fields equal the server value exactly
    #[test]
    fn prop_plain_fields_transparent(kinds in kinds_strategy(), value in scalar_strategy()) {
        let descriptor = build_descriptor(&kinds);
        let server = server_document(&kinds, &value);
        let prior = json!({"f0": "prior-value"});

        let outcome = reconcile(&descriptor, &prior, &server)
            .finalize(&FingerprintLedger::new(), &ReconcileOptions::default());

        for (i, concealed) in kinds.iter().enumerate() {
            if !concealed {
                prop_assert_eq!(outcome.document.get(format!("f{i}")), Some(&value));
            }
        }
    }

    /// Property: a document reconciled against itself is stable and keeps its plaintext
    #[test]
    fn prop_round_trip_stable(kinds in kinds_strategy(), secret in "[a-z]{1,12}") {
        let descriptor = build_descriptor(&kinds);
        let members: Map<String, Value> = kinds
            .iter()
            .enumerate()
            .map(|(i, concealed)| {
                let field_value = if *concealed {
                    json!({"value": secret.clone(), "fingerprint": format!("fp{i}")})
                } else {
                    json!(i)
                };
                (format!("f{i}"), field_value)
            })
            .collect();
        let document = Value::Object(members);
        let ledger = FingerprintLedger::from_server_document(&descriptor, &document);

        let outcome = reconcile_with_ledger(
            &descriptor,
            &document,
            &document,
            &ledger,
            &ReconcileOptions::default(),
        );

        prop_assert!(!outcome.has_rotation());
        prop_assert_eq!(&outcome.fingerprints, &ledger);
        for (i, concealed) in kinds.iter().enumerate() {
            if *concealed {
                prop_assert_eq!(
                    outcome.document.get(format!("f{i}")),
                    Some(&json!({"value": secret.clone()}))
                );
            }
        }
    }

    /// Property: finalized documents never carry fingerprints
    #[test]
    fn prop_fingerprints_stripped(kinds in kinds_strategy(), value in scalar_strategy()) {
        let descriptor = build_descriptor(&kinds);
        let server = server_document(&kinds, &value);

        let outcome = reconcile(&descriptor, &json!({"f0": "p"}), &server)
            .finalize(&FingerprintLedger::new(), &ReconcileOptions::default());

        prop_assert!(!contains_key(&outcome.document, "fingerprint"));
        prop_assert_eq!(
            outcome.fingerprints.len(),
            kinds.iter().filter(|concealed| **concealed).count()
        );
    }

    /// Property: rotation of every secret leaves no plaintext behind
    #[test]
    fn prop_rotation_clears_all(kinds in kinds_strategy(), secret in "[a-z]{1,12}") {
        let descriptor = build_descriptor(&kinds);
        let prior: Map<String, Value> = (0..kinds.len())
            .map(|i| (format!("f{i}"), json!({"value": secret.clone(), "fingerprint": "old"})))
            .collect();
        let server = server_document(&kinds, &json!("plain"));

        let outcome = reconcile_with_ledger(
            &descriptor,
            &Value::Object(prior),
            &server,
            &FingerprintLedger::new(),
            &ReconcileOptions::default(),
        );

        for (i, concealed) in kinds.iter().enumerate() {
            if *concealed {
                prop_assert_eq!(outcome.document.get(format!("f{i}")), Some(&json!({})));
                let path = FieldPath::from(format!("f{i}").as_str());
                prop_assert!(outcome.rotated_paths().contains(&&path));
            }
        }
    }

    /// Property: redaction hides every declared plaintext
    #[test]
    fn prop_redaction_hides_plaintext(kinds in kinds_strategy(), secret in "[a-z]{6,12}") {
        let descriptor = build_descriptor(&kinds);
        let members: Map<String, Value> = kinds
            .iter()
            .enumerate()
            .filter(|(_, concealed)| **concealed)
            .map(|(i, _)| (format!("f{i}"), json!(secret.clone())))
            .collect();

        let safe = redact(&descriptor, &Value::Object(members));
        prop_assert!(!contains_text(&safe, &secret));
    }
}
