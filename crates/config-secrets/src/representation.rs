//! Run-time shapes of a concealed field.
//!
//! A concealed field appears in a document either as a bare scalar (the
//! legacy form) or as a wrapped object `{ "value": ..., "fingerprint": ... }`
//! with either member possibly absent. Every reader normalizes through
//! [`SecretRepresentation::normalize`] first and never branches on the raw
//! shape again.
//!
//! Plaintext is held in a [`SecretString`], so a representation can be
//! logged with `{:?}` without leaking the secret.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};

use crate::fingerprint::Fingerprint;

/// Key of the plaintext member in the wrapped form.
pub(crate) const VALUE_KEY: &str = "value";

/// Key of the fingerprint member in the wrapped form.
pub(crate) const FINGERPRINT_KEY: &str = "fingerprint";

/// Normalized concealed field.
///
/// # Examples
///
/// ```
/// use plugin_config_secrets::SecretRepresentation;
/// use serde_json::json;
///
/// let bare = SecretRepresentation::normalize(Some(&json!("secret1")));
/// assert_eq!(bare.plaintext(), Some("secret1"));
/// assert!(bare.fingerprint().is_none());
///
/// let wrapped = SecretRepresentation::normalize(Some(&json!({"fingerprint": "f1"})));
/// assert_eq!(wrapped.plaintext(), None);
/// assert_eq!(wrapped.fingerprint().unwrap().as_str(), "f1");
///
/// // Debug output never contains the plaintext
/// assert!(!format!("{bare:?}").contains("secret1"));
/// ```
#[derive(Debug)]
pub enum SecretRepresentation {
    /// The field is absent, `null`, or not a recognizable shape.
    Absent,
    /// Legacy bare scalar; the scalar is the plaintext.
    Bare(SecretString),
    /// Wrapped object form.
    Wrapped {
        /// Plaintext, when the document carries one.
        value: Option<SecretString>,
        /// Server fingerprint, when the document carries one.
        fingerprint: Option<Fingerprint>,
    },
}

impl SecretRepresentation {
    /// Normalizes the raw value found at a concealed field.
    ///
    /// Scalars other than strings (numbers and booleans) become their JSON
    /// text. Arrays, and objects nested inside the wrapped members, carry
    /// no usable secret and normalize to nothing.
    #[must_use]
    pub fn normalize(raw: Option<&Value>) -> Self {
        match raw {
            None | Some(Value::Null | Value::Array(_)) => Self::Absent,
            Some(Value::Object(members)) => Self::Wrapped {
                value: members
                    .get(VALUE_KEY)
                    .and_then(scalar_text)
                    .map(SecretString::from),
                fingerprint: members
                    .get(FINGERPRINT_KEY)
                    .and_then(scalar_text)
                    .map(Fingerprint::from),
            },
            Some(scalar) => scalar_text(scalar).map_or(Self::Absent, |text| {
                Self::Bare(SecretString::from(text))
            }),
        }
    }

    /// Returns the plaintext, if known.
    #[must_use]
    pub fn plaintext(&self) -> Option<&str> {
        match self {
            Self::Bare(secret)
            | Self::Wrapped {
                value: Some(secret),
                ..
            } => Some(secret.expose_secret()),
            Self::Absent | Self::Wrapped { value: None, .. } => None,
        }
    }

    /// Returns the fingerprint, if the wrapped form carries one.
    #[must_use]
    pub const fn fingerprint(&self) -> Option<&Fingerprint> {
        match self {
            Self::Wrapped { fingerprint, .. } => fingerprint.as_ref(),
            Self::Absent | Self::Bare(_) => None,
        }
    }

    /// Returns `true` when neither plaintext nor fingerprint is known.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(
            self,
            Self::Absent
                | Self::Wrapped {
                    value: None,
                    fingerprint: None
                }
        )
    }

    /// Splits the representation into plaintext and fingerprint.
    #[must_use]
    pub fn into_parts(self) -> (Option<SecretString>, Option<Fingerprint>) {
        match self {
            Self::Absent => (None, None),
            Self::Bare(secret) => (Some(secret), None),
            Self::Wrapped { value, fingerprint } => (value, fingerprint),
        }
    }

    /// Discards the plaintext and returns the fingerprint.
    #[must_use]
    pub fn into_fingerprint(self) -> Option<Fingerprint> {
        self.into_parts().1
    }

    /// Renders the canonical wrapped form.
    ///
    /// Returns `None` when nothing is known, in which case the field is
    /// omitted from the document.
    pub(crate) fn wrapped_value(
        plaintext: Option<&SecretString>,
        fingerprint: Option<&Fingerprint>,
    ) -> Option<Value> {
        if plaintext.is_none() && fingerprint.is_none() {
            return None;
        }
        let mut members = Map::new();
        if let Some(secret) = plaintext {
            members.insert(
                VALUE_KEY.to_string(),
                Value::String(secret.expose_secret().to_string()),
            );
        }
        if let Some(fp) = fingerprint {
            members.insert(
                FINGERPRINT_KEY.to_string(),
                Value::String(fp.as_str().to_string()),
            );
        }
        Some(Value::Object(members))
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_shapes() {
        assert!(matches!(SecretRepresentation::normalize(None), SecretRepresentation::Absent));
        assert!(SecretRepresentation::normalize(Some(&Value::Null)).is_empty());
        assert!(SecretRepresentation::normalize(Some(&json!(["a"]))).is_empty());
    }

    #[test]
    fn test_bare_number_becomes_text() {
        let rep = SecretRepresentation::normalize(Some(&json!(1234)));
        assert_eq!(rep.plaintext(), Some("1234"));
    }

    #[test]
    fn test_bare_bool_becomes_text() {
        let rep = SecretRepresentation::normalize(Some(&json!(true)));
        assert_eq!(rep.plaintext(), Some("true"));
    }

    #[test]
    fn test_wrapped_both_members() {
        let rep = SecretRepresentation::normalize(Some(&json!({"value": "s", "fingerprint": "f"})));
        assert_eq!(rep.plaintext(), Some("s"));
        assert_eq!(rep.fingerprint(), Some(&Fingerprint::new("f")));
        assert!(!rep.is_empty());
    }

    #[test]
    fn test_wrapped_null_value() {
        let rep = SecretRepresentation::normalize(Some(&json!({"value": null})));
        assert!(rep.is_empty());
    }

    #[test]
    fn test_wrapped_nested_object_ignored() {
        let rep = SecretRepresentation::normalize(Some(&json!({"value": {"x": 1}})));
        assert_eq!(rep.plaintext(), None);
    }

    #[test]
    fn test_bare_has_no_fingerprint() {
        let rep = SecretRepresentation::normalize(Some(&json!("plaintext-from-server")));
        assert_eq!(rep.into_fingerprint(), None);
    }

    #[test]
    fn test_into_parts() {
        let rep = SecretRepresentation::normalize(Some(&json!({"value": "s", "fingerprint": "f"})));
        let (value, fingerprint) = rep.into_parts();
        assert_eq!(value.unwrap().expose_secret(), "s");
        assert_eq!(fingerprint.unwrap().as_str(), "f");
    }

    #[test]
    fn test_wrapped_value_rendering() {
        let secret = SecretString::from("s");
        let fp = Fingerprint::new("f");

        assert_eq!(
            SecretRepresentation::wrapped_value(Some(&secret), Some(&fp)),
            Some(json!({"value": "s", "fingerprint": "f"}))
        );
        assert_eq!(
            SecretRepresentation::wrapped_value(None, Some(&fp)),
            Some(json!({"fingerprint": "f"}))
        );
        assert_eq!(SecretRepresentation::wrapped_value(None, None), None);
    }

    #[test]
    fn test_debug_redacts() {
        let rep = SecretRepresentation::normalize(Some(&json!({"value": "hunter2"})));
        assert!(!format!("{rep:?}").contains("hunter2"));
    }
}
