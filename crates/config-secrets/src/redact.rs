//! Plaintext redaction for logs and diagnostics.

use plugin_config_core::{ConfigField, Descriptor, FieldBehavior};
use serde_json::{Map, Value};

use crate::representation::VALUE_KEY;

/// Placeholder written in place of a concealed plaintext.
pub const REDACTED: &str = "[REDACTED]";

/// Returns a copy of `document` with every concealed plaintext replaced by
/// [`REDACTED`].
///
/// Both forms are handled: a bare scalar becomes the placeholder, and a
/// wrapped object keeps its `fingerprint` while its `value` is replaced.
/// `null` and absent secrets are left alone so the output still shows
/// which secrets are unknown. Fields the descriptor does not model are
/// copied unchanged.
///
/// # Examples
///
/// ```
/// use plugin_config_core::{ConfigField, Descriptor};
/// use plugin_config_secrets::redact;
/// use serde_json::json;
///
/// let descriptor = Descriptor::new(
///     "X",
///     "X",
///     vec![ConfigField::plain("host", true), ConfigField::concealed("password", true)],
/// );
///
/// let safe = redact(&descriptor, &json!({"host": "h", "password": {"value": "hunter2", "fingerprint": "f1"}}));
/// assert_eq!(safe, json!({"host": "h", "password": {"value": "[REDACTED]", "fingerprint": "f1"}}));
/// ```
#[must_use]
pub fn redact(descriptor: &Descriptor, document: &Value) -> Value {
    let mut redacted = document.clone();
    if let Some(members) = redacted.as_object_mut() {
        redact_level(&descriptor.fields, members);
    }
    redacted
}

fn redact_level(fields: &[ConfigField], members: &mut Map<String, Value>) {
    for field in fields {
        let Some(value) = members.get_mut(&field.name) else {
            continue;
        };
        match field.behavior() {
            FieldBehavior::Plain => {}
            FieldBehavior::Composite(children) => {
                if let Some(nested) = value.as_object_mut() {
                    redact_level(children, nested);
                }
            }
            FieldBehavior::Concealed => mask(value),
        }
    }
}

fn mask(value: &mut Value) {
    match value {
        Value::Null | Value::Array(_) => {}
        Value::Object(wrapped) => {
            if let Some(inner) = wrapped.get_mut(VALUE_KEY)
                && !inner.is_null()
            {
                *inner = Value::String(REDACTED.to_string());
            }
        }
        scalar => *scalar = Value::String(REDACTED.to_string()),
    }
}
