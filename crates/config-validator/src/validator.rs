//! Required-field validation.
//!
//! A field is missing only when its key is absent. `false`, `0`, `""` and
//! `null` all count as present.
//!
//! Composite fields never produce a violation of their own; their children
//! are checked against the nested object at the composite's name, or
//! against an empty object when that value is absent or not an object.
//!
//! Callers holding a document that is not fully known yet (for example one
//! built from deferred values) must skip validation instead of passing an
//! empty document, which would report every required field as missing.

use plugin_config_core::{
    ClassName, ConfigField, Descriptor, Error, FieldBehavior, FieldPath, FieldViolation, Result,
};
use serde_json::{Map, Value};
use std::fmt;

use crate::resolver::resolve;

/// Returns every required field path missing from `document`.
///
/// Violations are ordered like the descriptor fields (parents before
/// children, in declaration order). The result depends only on the
/// inputs.
///
/// # Examples
///
/// ```
/// use plugin_config_core::{ConfigField, Descriptor};
/// use plugin_config_validator::validate;
/// use serde_json::json;
///
/// let descriptor = Descriptor::new(
///     "X",
///     "X",
///     vec![ConfigField::composite("auth", false, vec![ConfigField::plain("user", true)])],
/// );
///
/// let violations = validate(&descriptor, &json!({"auth": {}}));
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].path.to_string(), "auth.user");
/// ```
#[must_use]
pub fn validate(descriptor: &Descriptor, document: &Value) -> Vec<FieldViolation> {
    let empty = Map::new();
    let object = document.as_object().unwrap_or(&empty);
    violations_in(
        &descriptor.fields,
        object,
        &FieldPath::root(),
        &descriptor.class_name,
    )
}

fn violations_in(
    fields: &[ConfigField],
    object: &Map<String, Value>,
    parent: &FieldPath,
    class_name: &ClassName,
) -> Vec<FieldViolation> {
    fields
        .iter()
        .flat_map(|field| {
            let path = parent.child(&field.name);
            match field.behavior() {
                FieldBehavior::Composite(children) => {
                    let empty = Map::new();
                    let nested = object
                        .get(&field.name)
                        .and_then(Value::as_object)
                        .unwrap_or(&empty);
                    violations_in(children, nested, &path, class_name)
                }
                FieldBehavior::Plain | FieldBehavior::Concealed => {
                    if field.required && !object.contains_key(&field.name) {
                        vec![FieldViolation::new(path, class_name.clone())]
                    } else {
                        Vec::new()
                    }
                }
            }
        })
        .collect()
}

/// Resolves `class_name` in `descriptors` and validates `document`.
///
/// # Errors
///
/// Returns [`Error::UnknownClass`] if no descriptor matches. Missing
/// fields are not an error here; they are reported in the returned
/// [`ValidationReport`].
pub fn validate_class(
    class_name: &ClassName,
    descriptors: &[Descriptor],
    document: &Value,
) -> Result<ValidationReport> {
    let descriptor = resolve(class_name, descriptors)?;
    let report = ValidationReport::new(class_name.clone(), validate(descriptor, document));

    if report.is_valid() {
        tracing::debug!("Configuration for {} satisfies its descriptor", class_name);
    } else {
        tracing::debug!(
            "Configuration for {} is missing {} required field(s)",
            class_name,
            report.violations.len()
        );
    }

    Ok(report)
}

/// Outcome of validating one document.
///
/// # Examples
///
/// ```
/// use plugin_config_core::{ClassName, FieldPath, FieldViolation};
/// use plugin_config_validator::ValidationReport;
///
/// let class = ClassName::new("X");
/// let report = ValidationReport::new(
///     class.clone(),
///     vec![FieldViolation::new(FieldPath::from("password"), class)],
/// );
///
/// assert!(!report.is_valid());
/// assert_eq!(report.to_string(), "missing required field 'password' for class 'X'");
/// assert!(report.into_result().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Class the document was validated against.
    pub class_name: ClassName,
    /// Every missing required field, in descriptor order.
    pub violations: Vec<FieldViolation>,
}

impl ValidationReport {
    /// Creates a report.
    #[must_use]
    pub const fn new(class_name: ClassName, violations: Vec<FieldViolation>) -> Self {
        Self {
            class_name,
            violations,
        }
    }

    /// Returns `true` when no required field is missing.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the missing paths rendered with `"."` separators.
    #[must_use]
    pub fn missing_paths(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.path.to_string()).collect()
    }

    /// Converts the report into a result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequiredFieldsMissing`] carrying every violation
    /// when the report is not valid.
    pub fn into_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::RequiredFieldsMissing {
                class_name: self.class_name,
                violations: self.violations,
            })
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "configuration for class '{}' is valid", self.class_name);
        }
        let lines: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        write!(f, "{}", lines.join("\n"))
    }
}
