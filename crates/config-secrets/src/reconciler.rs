//! Secret reconciliation.
//!
//! Reconciliation runs in two steps that callers normally perform together
//! through [`reconcile_with_ledger`]:
//!
//! 1. [`reconcile`] walks the descriptor and builds an intermediate
//!    document. Plain fields come from the server, concealed fields carry
//!    the caller's prior plaintext plus the server's fingerprint.
//! 2. [`ReconciledDocument::finalize`] compares every fingerprint with the
//!    caller's ledger, discards plaintext of rotated secrets, strips the
//!    fingerprints, and returns the new ledger.
//!
//! Server plaintext is never read. A concealed value the server sends in
//! the bare form is ignored entirely.

use plugin_config_core::{ConfigField, Descriptor, EngineConfig, FieldBehavior, FieldPath};
use secrecy::SecretString;
use serde_json::{Map, Value};

use crate::drift::{DriftOutcome, DriftReport, detect_drift};
use crate::fingerprint::{Fingerprint, FingerprintLedger};
use crate::representation::{FINGERPRINT_KEY, SecretRepresentation, VALUE_KEY};

/// Options controlling reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Keep server fields the descriptor does not model.
    pub pass_through_unknown_fields: bool,
    /// Discard the cached plaintext of rotated secrets.
    pub clear_rotated_plaintext: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            pass_through_unknown_fields: true,
            clear_rotated_plaintext: true,
        }
    }
}

impl From<&EngineConfig> for ReconcileOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            pass_through_unknown_fields: config.pass_through_unknown_fields,
            clear_rotated_plaintext: config.clear_rotated_plaintext,
        }
    }
}

/// One concealed field found while building the intermediate document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcealedSlot {
    /// Path of the field.
    pub path: FieldPath,
    /// Fingerprint stored in the prior document's wrapped form, if any.
    pub prior_fingerprint: Option<Fingerprint>,
    /// Fingerprint reported by the server, if any.
    pub server_fingerprint: Option<Fingerprint>,
    /// Whether the prior document carried a plaintext.
    pub plaintext_known: bool,
}

/// Intermediate result of [`reconcile`].
///
/// The document still carries `fingerprint` members on concealed fields.
/// It is not meant to be persisted; call [`finalize`](Self::finalize).
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledDocument {
    /// Document with wrapped concealed fields including fingerprints.
    pub document: Value,
    /// Every concealed field the walk reached, in descriptor order,
    /// including fields the document omits because nothing is known.
    pub slots: Vec<ConcealedSlot>,
}

/// Caller-facing result of reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// The document the caller should treat as current.
    pub document: Value,
    /// Fingerprints to persist for the next read: the server's, or the
    /// last known one where the server reported none.
    pub fingerprints: FingerprintLedger,
    /// Drift result per concealed field with a server fingerprint.
    pub drift: Vec<DriftReport>,
}

impl Reconciliation {
    /// Returns `true` if any secret was rotated out-of-band.
    #[must_use]
    pub fn has_rotation(&self) -> bool {
        self.drift.iter().any(|report| report.outcome.is_rotated())
    }

    /// Returns the paths of rotated secrets.
    #[must_use]
    pub fn rotated_paths(&self) -> Vec<&FieldPath> {
        self.drift
            .iter()
            .filter(|report| report.outcome.is_rotated())
            .map(|report| &report.path)
            .collect()
    }
}

/// Builds the intermediate reconciled document, keeping every unknown
/// server field.
///
/// `prior` is the caller's previous configuration (plaintext included) and
/// `server` the freshly fetched one (fingerprints only).
///
/// # Examples
///
/// ```
/// use plugin_config_core::{ConfigField, Descriptor};
/// use plugin_config_secrets::reconcile;
/// use serde_json::json;
///
/// let descriptor = Descriptor::new("X", "X", vec![ConfigField::concealed("password", true)]);
/// let reconciled = reconcile(
///     &descriptor,
///     &json!({"password": {"value": "secret1"}}),
///     &json!({"password": {"fingerprint": "f1"}}),
/// );
///
/// assert_eq!(
///     reconciled.document,
///     json!({"password": {"value": "secret1", "fingerprint": "f1"}})
/// );
/// ```
#[must_use]
pub fn reconcile(descriptor: &Descriptor, prior: &Value, server: &Value) -> ReconciledDocument {
    reconcile_with_options(descriptor, prior, server, &ReconcileOptions::default())
}

/// Like [`reconcile`], honoring `options.pass_through_unknown_fields`.
#[must_use]
pub fn reconcile_with_options(
    descriptor: &Descriptor,
    prior: &Value,
    server: &Value,
    options: &ReconcileOptions,
) -> ReconciledDocument {
    let (document, slots) = reconcile_level(
        &descriptor.fields,
        prior.as_object(),
        server.as_object(),
        &FieldPath::root(),
        options,
    );
    ReconciledDocument {
        document: Value::Object(document),
        slots,
    }
}

/// Reconciles and finalizes in one pass.
///
/// # Examples
///
/// ```
/// use plugin_config_core::{ConfigField, Descriptor, FieldPath};
/// use plugin_config_secrets::{Fingerprint, FingerprintLedger, ReconcileOptions, reconcile_with_ledger};
/// use serde_json::json;
///
/// let descriptor = Descriptor::new("X", "X", vec![ConfigField::concealed("password", true)]);
/// let mut ledger = FingerprintLedger::new();
/// ledger.insert(FieldPath::from("password"), Fingerprint::new("abc"));
///
/// let outcome = reconcile_with_ledger(
///     &descriptor,
///     &json!({"password": {"value": "secret1"}}),
///     &json!({"password": {"fingerprint": "xyz"}}),
///     &ledger,
///     &ReconcileOptions::default(),
/// );
///
/// assert!(outcome.has_rotation());
/// assert_eq!(outcome.document, json!({"password": {}}));
/// ```
#[must_use]
pub fn reconcile_with_ledger(
    descriptor: &Descriptor,
    prior: &Value,
    server: &Value,
    ledger: &FingerprintLedger,
    options: &ReconcileOptions,
) -> Reconciliation {
    reconcile_with_options(descriptor, prior, server, options).finalize(ledger, options)
}

type Level = (Map<String, Value>, Vec<ConcealedSlot>);

fn reconcile_level(
    fields: &[ConfigField],
    prior: Option<&Map<String, Value>>,
    server: Option<&Map<String, Value>>,
    parent: &FieldPath,
    options: &ReconcileOptions,
) -> Level {
    let mut document = Map::new();
    let mut slots = Vec::new();

    for field in fields {
        let path = parent.child(&field.name);
        let server_value = server.and_then(|members| members.get(&field.name));
        let prior_value = prior.and_then(|members| members.get(&field.name));

        match field.behavior() {
            FieldBehavior::Plain => {
                if let Some(value) = server_value {
                    document.insert(field.name.clone(), value.clone());
                }
            }
            FieldBehavior::Composite(children) => {
                let server_nested = server_value.and_then(Value::as_object);
                let (nested, nested_slots) = reconcile_level(
                    children,
                    prior_value.and_then(Value::as_object),
                    server_nested,
                    &path,
                    options,
                );
                slots.extend(nested_slots);

                match server_value {
                    // Not an object on the server side; nothing to reconcile inside.
                    Some(value) if !value.is_object() && !value.is_null() => {
                        document.insert(field.name.clone(), value.clone());
                    }
                    _ if server_nested.is_some() || !nested.is_empty() => {
                        document.insert(field.name.clone(), Value::Object(nested));
                    }
                    Some(Value::Null) => {
                        document.insert(field.name.clone(), Value::Null);
                    }
                    _ => {}
                }
            }
            FieldBehavior::Concealed => {
                let (plaintext, prior_fingerprint) =
                    SecretRepresentation::normalize(prior_value).into_parts();
                let server_fingerprint =
                    SecretRepresentation::normalize(server_value).into_fingerprint();

                if let Some(wrapped) = SecretRepresentation::wrapped_value(
                    plaintext.as_ref(),
                    server_fingerprint.as_ref(),
                ) {
                    document.insert(field.name.clone(), wrapped);
                }
                slots.push(ConcealedSlot {
                    path,
                    prior_fingerprint,
                    server_fingerprint,
                    plaintext_known: plaintext.is_some(),
                });
            }
        }
    }

    if options.pass_through_unknown_fields
        && let Some(server) = server
    {
        for (key, value) in server {
            if !fields.iter().any(|field| field.name == *key) {
                document.insert(key.clone(), value.clone());
            }
        }
    }

    (document, slots)
}

impl ReconciledDocument {
    /// Runs drift detection and produces the caller-facing document.
    ///
    /// The prior fingerprint of each concealed field is the ledger entry
    /// for its path, falling back to the `fingerprint` member the prior
    /// document carried (state persisted by older callers). When the
    /// server omits a fingerprint, the prior one is carried into the new
    /// ledger so the next read can still detect rotation.
    #[must_use]
    pub fn finalize(self, ledger: &FingerprintLedger, options: &ReconcileOptions) -> Reconciliation {
        let Self {
            mut document,
            slots,
        } = self;
        let mut fingerprints = FingerprintLedger::new();
        let mut drift = Vec::new();

        for slot in slots {
            let prior = ledger
                .get(&slot.path)
                .or(slot.prior_fingerprint.as_ref())
                .cloned();
            let outcome = detect_drift(prior.as_ref(), slot.server_fingerprint.as_ref());
            let plaintext_cleared =
                outcome.is_rotated() && options.clear_rotated_plaintext && slot.plaintext_known;

            if let Some(members) = wrapped_members_mut(&mut document, &slot.path) {
                members.remove(FINGERPRINT_KEY);
                if plaintext_cleared {
                    members.remove(VALUE_KEY);
                }
            }

            if outcome == DriftOutcome::Rotated {
                tracing::warn!(
                    "Secret at {} was rotated out-of-band{}",
                    slot.path,
                    if plaintext_cleared {
                        "; cached plaintext discarded"
                    } else {
                        ""
                    }
                );
            }

            if let Some(fingerprint) = slot.server_fingerprint {
                drift.push(DriftReport {
                    path: slot.path.clone(),
                    outcome,
                    plaintext_was_known: slot.plaintext_known,
                    plaintext_cleared,
                });
                fingerprints.insert(slot.path, fingerprint);
            } else if let Some(fingerprint) = prior {
                // Nothing to compare this time; keep the last known one.
                fingerprints.insert(slot.path, fingerprint);
            }
        }

        tracing::debug!(
            "Reconciled {} concealed field(s), {} rotated",
            drift.len(),
            drift.iter().filter(|r| r.outcome.is_rotated()).count()
        );

        Reconciliation {
            document,
            fingerprints,
            drift,
        }
    }

    /// Returns the plaintext the intermediate document holds for `path`.
    #[must_use]
    pub fn plaintext_at(&self, path: &FieldPath) -> Option<SecretString> {
        let raw = crate::fingerprint::lookup(&self.document, path);
        SecretRepresentation::normalize(raw).into_parts().0
    }
}

fn wrapped_members_mut<'a>(
    document: &'a mut Value,
    path: &FieldPath,
) -> Option<&'a mut Map<String, Value>> {
    path.segments()
        .iter()
        .try_fold(document, |current, segment| {
            current.as_object_mut()?.get_mut(segment)
        })?
        .as_object_mut()
}
