//! Descriptor model for plugin configuration.
//!
//! A descriptor is the server-declared schema for one plugin
//! implementation: its class name, a display label, and an ordered list of
//! configuration fields. Fields are plain, concealed (secrets the server
//! never returns), or composite (nested objects with their own fields).
//!
//! The serde representation matches the wire shape served by the remote
//! descriptor endpoint:
//!
//! ```json
//! {
//!   "className": "com.example.Basic",
//!   "label": "Basic",
//!   "configurationFields": [
//!     { "name": "password", "type": "CONCEALED", "required": true },
//!     { "name": "auth", "type": "COMPOSITE", "required": false,
//!       "fields": [{ "name": "user", "type": "TEXT", "required": true }] }
//!   ]
//! }
//! ```
//!
//! Descriptors originate from an independently versioned service, so an
//! inconsistent descriptor never fails parsing. [`ConfigField::behavior`]
//! degrades anything it cannot interpret to plain behavior, and
//! [`Descriptor::integrity_issues`] reports the inconsistencies for logging.

use crate::{ClassName, Error, FieldPath, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Wire type name of a concealed field.
const CONCEALED_TYPE: &str = "CONCEALED";

/// Wire type name of a composite field.
const COMPOSITE_TYPE: &str = "COMPOSITE";

/// Wire type names that carry no special behavior.
const PLAIN_TYPES: &[&str] = &[
    "TEXT",
    "TEXTAREA",
    "TIME",
    "SELECT",
    "GROUPED_SELECT",
    "CHECKBOX",
    "AUTOCOMPLETEOPEN",
    "AUTOCOMPLETECLOSED",
    "LIST",
    "TABLE",
    "FILE",
    "RADIO_BUTTON",
    "LINK",
    "HIDDEN",
];

/// Classification of a field's declared wire type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A recognized type with no special handling.
    Plain,
    /// A secret; the server returns only a fingerprint.
    Concealed,
    /// A nested object described by the field's children.
    Composite,
    /// A type this engine does not recognize.
    Other,
}

impl FieldKind {
    /// Classifies a wire type name, ignoring ASCII case.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_config_core::FieldKind;
    ///
    /// assert_eq!(FieldKind::from_type_name("CONCEALED"), FieldKind::Concealed);
    /// assert_eq!(FieldKind::from_type_name("composite"), FieldKind::Composite);
    /// assert_eq!(FieldKind::from_type_name("TEXT"), FieldKind::Plain);
    /// assert_eq!(FieldKind::from_type_name("HOLOGRAM"), FieldKind::Other);
    /// ```
    #[must_use]
    pub fn from_type_name(type_name: &str) -> Self {
        if type_name.eq_ignore_ascii_case(CONCEALED_TYPE) {
            Self::Concealed
        } else if type_name.eq_ignore_ascii_case(COMPOSITE_TYPE) {
            Self::Composite
        } else if PLAIN_TYPES
            .iter()
            .any(|plain| type_name.eq_ignore_ascii_case(plain))
        {
            Self::Plain
        } else {
            Self::Other
        }
    }
}

/// How the engine treats a field once descriptor inconsistencies are
/// resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldBehavior<'a> {
    /// Copied and checked as an opaque value.
    Plain,
    /// Handled as a secret.
    Concealed,
    /// Walked recursively through the given children.
    Composite(&'a [ConfigField]),
}

/// One entry in a descriptor's field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigField {
    /// JSON key of the field, relative to its parent object.
    pub name: String,

    /// Wire type name, such as `TEXT`, `CONCEALED`, or `COMPOSITE`.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub field_type: String,

    /// Whether a declared document must contain this field.
    #[serde(default, deserialize_with = "null_as_default")]
    pub required: bool,

    /// Nested fields; only meaningful for composite fields.
    #[serde(
        rename = "fields",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<Self>,
}

impl ConfigField {
    /// Creates a field with an explicit wire type and no children.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            required,
            children: Vec::new(),
        }
    }

    /// Creates a plain `TEXT` field.
    #[must_use]
    pub fn plain(name: impl Into<String>, required: bool) -> Self {
        Self::new(name, "TEXT", required)
    }

    /// Creates a concealed field.
    #[must_use]
    pub fn concealed(name: impl Into<String>, required: bool) -> Self {
        Self::new(name, CONCEALED_TYPE, required)
    }

    /// Creates a composite field with the given children.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_config_core::{ConfigField, FieldBehavior};
    ///
    /// let auth = ConfigField::composite("auth", false, vec![ConfigField::plain("user", true)]);
    /// assert!(matches!(auth.behavior(), FieldBehavior::Composite(children) if children.len() == 1));
    /// ```
    #[must_use]
    pub fn composite(name: impl Into<String>, required: bool, children: Vec<Self>) -> Self {
        Self {
            name: name.into(),
            field_type: COMPOSITE_TYPE.to_string(),
            required,
            children,
        }
    }

    /// Returns the classification of the declared wire type.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        FieldKind::from_type_name(&self.field_type)
    }

    /// Returns how the engine treats this field.
    ///
    /// A composite field without children and any field of an unrecognized
    /// type behave as plain fields. Children on a non-composite field are
    /// ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_config_core::{ConfigField, FieldBehavior};
    ///
    /// let hollow = ConfigField::composite("auth", true, vec![]);
    /// assert_eq!(hollow.behavior(), FieldBehavior::Plain);
    /// ```
    #[must_use]
    pub fn behavior(&self) -> FieldBehavior<'_> {
        match self.kind() {
            FieldKind::Concealed => FieldBehavior::Concealed,
            FieldKind::Composite if !self.children.is_empty() => {
                FieldBehavior::Composite(&self.children)
            }
            FieldKind::Composite | FieldKind::Plain | FieldKind::Other => FieldBehavior::Plain,
        }
    }
}

/// Server-declared schema for one plugin implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// Plugin class name, unique within a descriptor set.
    pub class_name: ClassName,

    /// Display name. Opaque to the engine.
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,

    /// Configuration fields in declaration order.
    #[serde(rename = "configurationFields", default, deserialize_with = "null_as_default")]
    pub fields: Vec<ConfigField>,
}

/// Reads an optional wire member, mapping an explicit `null` to the default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Descriptor {
    /// Creates a new descriptor.
    #[must_use]
    pub fn new(class_name: impl Into<ClassName>, label: impl Into<String>, fields: Vec<ConfigField>) -> Self {
        Self {
            class_name: class_name.into(),
            label: label.into(),
            fields,
        }
    }

    /// Parses a single descriptor from its wire JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDescriptor`] if the text is not a
    /// descriptor object.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_config_core::Descriptor;
    ///
    /// let descriptor = Descriptor::from_json(
    ///     r#"{"className":"X","configurationFields":[{"name":"password","type":"CONCEALED","required":true}]}"#,
    /// )
    /// .unwrap();
    /// assert_eq!(descriptor.class_name.as_str(), "X");
    /// assert_eq!(descriptor.fields.len(), 1);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::MalformedDescriptor {
            message: format!("invalid descriptor: {e}"),
            source: Some(e),
        })
    }

    /// Returns the path of every effective concealed field, in declaration
    /// order (parents before children).
    #[must_use]
    pub fn concealed_paths(&self) -> Vec<FieldPath> {
        concealed_paths_in(&self.fields, &FieldPath::root())
    }

    /// Reports descriptor inconsistencies without failing.
    ///
    /// The engine tolerates every issue reported here; callers typically
    /// log them so the descriptor owner can fix the server side.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_config_core::{ConfigField, Descriptor, DescriptorIssueKind};
    ///
    /// let descriptor = Descriptor::new(
    ///     "X",
    ///     "X",
    ///     vec![ConfigField::plain("a", true), ConfigField::plain("a", false)],
    /// );
    /// let issues = descriptor.integrity_issues();
    /// assert_eq!(issues.len(), 1);
    /// assert_eq!(issues[0].kind, DescriptorIssueKind::DuplicateName);
    /// ```
    #[must_use]
    pub fn integrity_issues(&self) -> Vec<DescriptorIssue> {
        issues_in(&self.fields, &FieldPath::root())
    }
}

fn concealed_paths_in(fields: &[ConfigField], parent: &FieldPath) -> Vec<FieldPath> {
    fields
        .iter()
        .flat_map(|field| match field.behavior() {
            FieldBehavior::Concealed => vec![parent.child(&field.name)],
            FieldBehavior::Composite(children) => {
                concealed_paths_in(children, &parent.child(&field.name))
            }
            FieldBehavior::Plain => Vec::new(),
        })
        .collect()
}

fn issues_in(fields: &[ConfigField], parent: &FieldPath) -> Vec<DescriptorIssue> {
    let mut seen = HashSet::new();
    let mut issues = Vec::new();

    for field in fields {
        let path = parent.child(&field.name);

        if !seen.insert(field.name.as_str()) {
            issues.push(DescriptorIssue::new(path.clone(), DescriptorIssueKind::DuplicateName));
        }

        match field.kind() {
            FieldKind::Composite if field.children.is_empty() => {
                issues.push(DescriptorIssue::new(
                    path.clone(),
                    DescriptorIssueKind::EmptyComposite,
                ));
            }
            FieldKind::Composite => {}
            kind => {
                if kind == FieldKind::Other {
                    issues.push(DescriptorIssue::new(
                        path.clone(),
                        DescriptorIssueKind::UnrecognizedType(field.field_type.clone()),
                    ));
                }
                if !field.children.is_empty() {
                    issues.push(DescriptorIssue::new(
                        path.clone(),
                        DescriptorIssueKind::UnexpectedChildren,
                    ));
                }
            }
        }

        if field.kind() == FieldKind::Composite {
            issues.extend(issues_in(&field.children, &path));
        }
    }

    issues
}

/// A descriptor inconsistency the engine tolerates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorIssue {
    /// Path of the offending field.
    pub path: FieldPath,
    /// What is wrong with it.
    pub kind: DescriptorIssueKind,
}

impl DescriptorIssue {
    const fn new(path: FieldPath, kind: DescriptorIssueKind) -> Self {
        Self { path, kind }
    }
}

impl fmt::Display for DescriptorIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DescriptorIssueKind::DuplicateName => {
                write!(f, "field '{}' is declared more than once", self.path)
            }
            DescriptorIssueKind::EmptyComposite => {
                write!(f, "composite field '{}' has no children; treated as plain", self.path)
            }
            DescriptorIssueKind::UnexpectedChildren => {
                write!(f, "non-composite field '{}' has children; ignored", self.path)
            }
            DescriptorIssueKind::UnrecognizedType(type_name) => {
                write!(f, "field '{}' has unrecognized type '{type_name}'; treated as plain", self.path)
            }
        }
    }
}

/// Kinds of descriptor inconsistency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorIssueKind {
    /// Two fields share a name at the same nesting level.
    DuplicateName,
    /// A composite field declares no children.
    EmptyComposite,
    /// A non-composite field declares children.
    UnexpectedChildren,
    /// The field's wire type is not recognized.
    UnrecognizedType(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DescriptorSetWire {
    Envelope { items: Vec<Descriptor> },
    Bare(Vec<Descriptor>),
}

/// Parses a descriptor set from wire JSON.
///
/// Accepts either a bare array of descriptors or the server's
/// `{ "items": [...] }` envelope. Order is preserved.
///
/// # Errors
///
/// Returns [`Error::MalformedDescriptor`] if the text is neither form.
///
/// # Examples
///
/// ```
/// use plugin_config_core::parse_descriptor_set;
///
/// let bare = parse_descriptor_set(r#"[{"className":"A"},{"className":"B"}]"#).unwrap();
/// let wrapped = parse_descriptor_set(r#"{"items":[{"className":"A"},{"className":"B"}]}"#).unwrap();
/// assert_eq!(bare, wrapped);
/// ```
pub fn parse_descriptor_set(json: &str) -> Result<Vec<Descriptor>> {
    serde_json::from_str::<DescriptorSetWire>(json)
        .map(|wire| match wire {
            DescriptorSetWire::Envelope { items } => items,
            DescriptorSetWire::Bare(descriptors) => descriptors,
        })
        .map_err(|e| Error::MalformedDescriptor {
            message: format!("invalid descriptor set: {e}"),
            source: Some(e),
        })
}
