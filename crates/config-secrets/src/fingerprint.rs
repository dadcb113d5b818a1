//! Secret fingerprints and the caller-side fingerprint ledger.
//!
//! A fingerprint is the opaque, non-reversible token the server returns in
//! place of a secret. It is only ever compared for equality. The ledger
//! records the last fingerprint seen for each concealed field so the next
//! read can tell whether the secret changed without the caller's help.

use plugin_config_core::{Descriptor, FieldPath};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::representation::SecretRepresentation;

/// Opaque secret fingerprint (newtype over String).
///
/// # Examples
///
/// ```
/// use plugin_config_secrets::Fingerprint;
///
/// let fp = Fingerprint::new("abc");
/// assert_eq!(fp.as_str(), "abc");
/// assert_eq!(fp, Fingerprint::from("abc"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Creates a new fingerprint.
    #[inline]
    #[must_use]
    pub fn new(fingerprint: impl Into<String>) -> Self {
        Self(fingerprint.into())
    }

    /// Returns the fingerprint as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Fingerprint` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Fingerprint {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Last known fingerprint per concealed field path.
///
/// Serializes as a JSON object keyed by dotted paths so the caller can
/// persist it next to its configuration. Dots and backslashes inside a
/// field name are escaped with a backslash (see [`FieldPath::to_escaped`]).
///
/// # Examples
///
/// ```
/// use plugin_config_core::FieldPath;
/// use plugin_config_secrets::{Fingerprint, FingerprintLedger};
///
/// let mut ledger = FingerprintLedger::new();
/// ledger.insert(FieldPath::from("auth.password"), Fingerprint::new("f1"));
///
/// let json = serde_json::to_string(&ledger).unwrap();
/// assert_eq!(json, r#"{"auth.password":"f1"}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FingerprintLedger(BTreeMap<FieldPath, Fingerprint>);

impl FingerprintLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Collects the fingerprints a server document reports for every
    /// concealed field of `descriptor`.
    ///
    /// Useful for seeding a ledger right after a create, before any
    /// reconciliation has run.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_config_core::{ConfigField, Descriptor, FieldPath};
    /// use plugin_config_secrets::FingerprintLedger;
    /// use serde_json::json;
    ///
    /// let descriptor = Descriptor::new("X", "X", vec![ConfigField::concealed("password", true)]);
    /// let ledger = FingerprintLedger::from_server_document(
    ///     &descriptor,
    ///     &json!({"password": {"fingerprint": "f1"}}),
    /// );
    /// assert_eq!(ledger.get(&FieldPath::from("password")).unwrap().as_str(), "f1");
    /// ```
    #[must_use]
    pub fn from_server_document(descriptor: &Descriptor, document: &Value) -> Self {
        descriptor
            .concealed_paths()
            .into_iter()
            .filter_map(|path| {
                let representation = SecretRepresentation::normalize(lookup(document, &path));
                representation.into_fingerprint().map(|fp| (path, fp))
            })
            .collect()
    }

    /// Returns the fingerprint recorded for `path`.
    #[must_use]
    pub fn get(&self, path: &FieldPath) -> Option<&Fingerprint> {
        self.0.get(path)
    }

    /// Records a fingerprint, returning the one it replaced.
    pub fn insert(&mut self, path: FieldPath, fingerprint: Fingerprint) -> Option<Fingerprint> {
        self.0.insert(path, fingerprint)
    }

    /// Forgets the fingerprint recorded for `path`.
    pub fn remove(&mut self, path: &FieldPath) -> Option<Fingerprint> {
        self.0.remove(path)
    }

    /// Returns the number of recorded fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over recorded fingerprints in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &Fingerprint)> {
        self.0.iter()
    }
}

impl FromIterator<(FieldPath, Fingerprint)> for FingerprintLedger {
    fn from_iter<I: IntoIterator<Item = (FieldPath, Fingerprint)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Follows `path` through nested objects of `document`.
pub(crate) fn lookup<'a>(document: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(document, |current, segment| current.as_object()?.get(segment))
}
