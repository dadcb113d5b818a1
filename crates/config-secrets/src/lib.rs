//! Secret reconciliation for plugin configuration.
//!
//! The remote server never returns the plaintext of a concealed field, only
//! an opaque fingerprint proving it holds some secret. The caller's only
//! source of plaintext is what it declared earlier. This crate combines the
//! two into the document the caller should treat as current:
//!
//! - plain fields come from the server verbatim
//! - concealed fields keep the caller's prior plaintext, never the server's
//! - fingerprints are compared against the caller's ledger to detect
//!   secrets rotated out-of-band, and then stripped from the document
//!
//! # Examples
//!
//! ```
//! use plugin_config_core::{ConfigField, Descriptor};
//! use plugin_config_secrets::{FingerprintLedger, ReconcileOptions, reconcile};
//! use serde_json::json;
//!
//! let descriptor = Descriptor::new("X", "X", vec![ConfigField::concealed("password", true)]);
//! let prior = json!({"password": {"value": "secret1"}});
//! let server = json!({"password": {"fingerprint": "f1"}});
//!
//! let outcome = reconcile(&descriptor, &prior, &server)
//!     .finalize(&FingerprintLedger::new(), &ReconcileOptions::default());
//!
//! assert_eq!(outcome.document, json!({"password": {"value": "secret1"}}));
//! assert_eq!(outcome.fingerprints.len(), 1);
//! assert!(!outcome.has_rotation());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod drift;
pub mod fingerprint;
pub mod reconciler;
pub mod redact;
pub mod representation;

pub use drift::{DriftOutcome, DriftReport, detect_drift};
pub use fingerprint::{Fingerprint, FingerprintLedger};
pub use reconciler::{
    ConcealedSlot, ReconcileOptions, ReconciledDocument, Reconciliation, reconcile,
    reconcile_with_ledger, reconcile_with_options,
};
pub use redact::{REDACTED, redact};
pub use representation::SecretRepresentation;
