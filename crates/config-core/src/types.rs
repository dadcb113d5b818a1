//! Strong domain types for plugin configuration.
//!
//! Plugin class names, plugin families, and field paths are all strings on
//! the wire. Wrapping them keeps a class name from being passed where a
//! family is expected and gives field paths one canonical rendering.
//!
//! # Examples
//!
//! ```
//! use plugin_config_core::{ClassName, FieldPath, PluginFamily};
//!
//! let class = ClassName::new("com.example.PasswordAuthenticator");
//! let family = PluginFamily::new("siteAuthenticators");
//! let path = FieldPath::root().child("auth").child("user");
//!
//! assert_eq!(path.to_string(), "auth.user");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Plugin class name (newtype over String).
///
/// Identifies one plugin implementation, and therefore one descriptor,
/// within a descriptor set.
///
/// # Examples
///
/// ```
/// use plugin_config_core::ClassName;
///
/// let class = ClassName::new("com.example.Basic");
/// assert_eq!(class.as_str(), "com.example.Basic");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassName(String);

impl ClassName {
    /// Creates a new class name.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_config_core::ClassName;
    ///
    /// let name = ClassName::new("A");
    /// let from_string = ClassName::new(String::from("A"));
    /// assert_eq!(name, from_string);
    /// ```
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the class name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ClassName` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ClassName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ClassName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Plugin family identifier (newtype over String).
///
/// A family groups the descriptors the server publishes for one kind of
/// pluggable resource, such as access token validators or site
/// authenticators.
///
/// # Examples
///
/// ```
/// use plugin_config_core::PluginFamily;
///
/// let family = PluginFamily::new("hsmProviders");
/// assert_eq!(family.to_string(), "hsmProviders");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginFamily(String);

impl PluginFamily {
    /// Creates a new plugin family identifier.
    #[inline]
    #[must_use]
    pub fn new(family: impl Into<String>) -> Self {
        Self(family.into())
    }

    /// Returns the family as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PluginFamily` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PluginFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PluginFamily {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PluginFamily {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Path of a field inside a configuration document.
///
/// Each segment is a JSON key relative to its parent object. The path
/// renders as the segments joined with `"."`, the form used in violation
/// messages. `From<&str>` splits on every `"."`.
///
/// Keys may themselves contain dots, so serde uses the escaped form
/// instead (see [`FieldPath::to_escaped`]), which round-trips exactly.
///
/// # Examples
///
/// ```
/// use plugin_config_core::FieldPath;
///
/// let path = FieldPath::root().child("auth").child("user");
/// assert_eq!(path.segments(), ["auth", "user"]);
/// assert_eq!(path.to_string(), "auth.user");
/// assert_eq!(FieldPath::from("auth.user"), path);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Returns the empty path, which addresses the document itself.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a new path with `name` appended.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    /// Returns the path segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns the final segment, or `None` for the root path.
    #[must_use]
    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Returns `true` if this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the path with `\\` and `.` inside segments escaped by a
    /// backslash.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_config_core::FieldPath;
    ///
    /// let path = FieldPath::root().child("proxy").child("key.secret");
    /// assert_eq!(path.to_escaped(), r"proxy.key\.secret");
    /// assert_eq!(FieldPath::from_escaped(&path.to_escaped()), path);
    /// ```
    #[must_use]
    pub fn to_escaped(&self) -> String {
        self.0
            .iter()
            .map(|segment| segment.replace('\\', r"\\").replace('.', r"\."))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Parses the form produced by [`to_escaped`](Self::to_escaped).
    ///
    /// The empty string is the root path. A trailing lone backslash is
    /// kept literally.
    #[must_use]
    pub fn from_escaped(text: &str) -> Self {
        if text.is_empty() {
            return Self::root();
        }
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => current.push(chars.next().unwrap_or('\\')),
                '.' => segments.push(std::mem::take(&mut current)),
                other => current.push(other),
            }
        }
        segments.push(current);
        Self(segments)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_escaped())
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::from_escaped(&text))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            return Self::root();
        }
        Self(s.split('.').map(str::to_string).collect())
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// A required field that is missing from a configuration document.
///
/// Violations are values rather than errors: the validator collects every
/// one of them for a document and reports them together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Path of the missing field, relative to the document root.
    pub path: FieldPath,
    /// Class whose descriptor declared the field as required.
    pub class_name: ClassName,
}

impl FieldViolation {
    /// Creates a new violation.
    #[must_use]
    pub const fn new(path: FieldPath, class_name: ClassName) -> Self {
        Self { path, class_name }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "missing required field '{}' for class '{}'",
            self.path, self.class_name
        )
    }
}
