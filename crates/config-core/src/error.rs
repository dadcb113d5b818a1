//! Error types for plugin configuration handling.
//!
//! Every error here is a deterministic function of its inputs: retrying
//! with the same descriptor set and documents produces the same failure.
//! The only transient failure is a descriptor fetch, which belongs to the
//! caller-supplied [`DescriptorSource`](crate::traits::DescriptorSource)
//! and is surfaced as [`Error::DescriptorFetch`].
//!
//! # Examples
//!
//! ```
//! use plugin_config_core::{ClassName, Error, UnknownClassError};
//!
//! let err: Error = UnknownClassError::new(
//!     ClassName::new("C"),
//!     vec![ClassName::new("A"), ClassName::new("B")],
//! )
//! .into();
//!
//! assert!(err.is_unknown_class());
//! assert_eq!(
//!     err.to_string(),
//!     "Unknown plugin class 'C'; valid classes are: A, B"
//! );
//! ```

use crate::{ClassName, FieldViolation, PluginFamily};
use thiserror::Error;

/// Requested plugin class has no matching descriptor.
///
/// Carries the full list of valid class names in descriptor-set order so
/// the caller can present an actionable diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown plugin class '{requested}'; valid classes are: {}", join_class_names(.available))]
pub struct UnknownClassError {
    /// Class name that was requested.
    pub requested: ClassName,
    /// Every class name in the descriptor set, in input order.
    pub available: Vec<ClassName>,
}

impl UnknownClassError {
    /// Creates a new unknown class error.
    #[must_use]
    pub const fn new(requested: ClassName, available: Vec<ClassName>) -> Self {
        Self {
            requested,
            available,
        }
    }

    /// Returns the valid class names joined with `", "`, or `(none)` when
    /// the descriptor set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_config_core::{ClassName, UnknownClassError};
    ///
    /// let err = UnknownClassError::new(
    ///     ClassName::new("C"),
    ///     vec![ClassName::new("A"), ClassName::new("B")],
    /// );
    /// assert_eq!(err.available_list(), "A, B");
    /// ```
    #[must_use]
    pub fn available_list(&self) -> String {
        join_class_names(&self.available)
    }
}

fn join_class_names(names: &[ClassName]) -> String {
    if names.is_empty() {
        return "(none)".to_string();
    }
    names
        .iter()
        .map(ClassName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_violation_paths(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.path.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Main error type for plugin configuration handling.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested plugin class has no matching descriptor.
    ///
    /// Never retried: the caller must fix its declared class name.
    #[error(transparent)]
    UnknownClass(#[from] UnknownClassError),

    /// A descriptor source has no descriptors for the requested family.
    #[error("Unknown plugin family: {family}")]
    UnknownFamily {
        /// Family that was requested
        family: PluginFamily,
    },

    /// One or more required fields are missing from a declared document.
    ///
    /// Produced when a validation report is converted into a result; the
    /// report itself keeps every violation.
    #[error(
        "{} required field(s) missing for class '{class_name}': {}",
        .violations.len(),
        join_violation_paths(.violations)
    )]
    RequiredFieldsMissing {
        /// Class the document was validated against
        class_name: ClassName,
        /// Every missing field, in descriptor order
        violations: Vec<FieldViolation>,
    },

    /// Fetching descriptors from the remote server failed.
    ///
    /// Fetch failures are propagated rather than treated as an empty
    /// descriptor set, so concealed fields are never mistaken for plain ones.
    #[error("Failed to fetch descriptors for plugin family '{family}'")]
    DescriptorFetch {
        /// Family whose descriptors were requested
        family: PluginFamily,
        /// Underlying error cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A descriptor document could not be parsed.
    #[error("Malformed descriptor document: {message}")]
    MalformedDescriptor {
        /// Description of the parse failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Engine configuration is invalid.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },
}

impl Error {
    /// Returns `true` if this is an unknown class error.
    #[must_use]
    pub const fn is_unknown_class(&self) -> bool {
        matches!(self, Self::UnknownClass(_))
    }

    /// Returns `true` if this is an unknown family error.
    #[must_use]
    pub const fn is_unknown_family(&self) -> bool {
        matches!(self, Self::UnknownFamily { .. })
    }

    /// Returns `true` if this error carries required field violations.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_config_core::{ClassName, Error, FieldPath, FieldViolation};
    ///
    /// let err = Error::RequiredFieldsMissing {
    ///     class_name: ClassName::new("X"),
    ///     violations: vec![FieldViolation::new(FieldPath::from("password"), ClassName::new("X"))],
    /// };
    /// assert!(err.is_validation_error());
    /// assert_eq!(err.violations().len(), 1);
    /// ```
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::RequiredFieldsMissing { .. })
    }

    /// Returns `true` if this is a descriptor fetch failure.
    #[must_use]
    pub const fn is_fetch_error(&self) -> bool {
        matches!(self, Self::DescriptorFetch { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns the violations carried by this error, or an empty slice.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::RequiredFieldsMissing { violations, .. } => violations,
            _ => &[],
        }
    }
}

/// Result type alias for plugin configuration operations.
pub type Result<T> = std::result::Result<T, Error>;
