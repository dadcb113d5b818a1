//! Engine configuration.
//!
//! The engine owns no files or environment variables. Hosts that keep the
//! settings in their own TOML configuration can embed an `[engine]` table
//! and hand its text to [`EngineConfig::from_toml_str`].
//!
//! # Examples
//!
//! ```
//! use plugin_config_core::EngineConfig;
//!
//! // Use default configuration
//! let config = EngineConfig::default();
//! assert!(config.clear_rotated_plaintext);
//!
//! // Create custom configuration
//! let custom = EngineConfig {
//!     pass_through_unknown_fields: false,
//!     ..Default::default()
//! };
//! assert!(!custom.pass_through_unknown_fields);
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for validation and reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct EngineConfig {
    /// Keep server fields the descriptor does not model.
    ///
    /// When disabled, reconciled documents contain only descriptor fields.
    /// Default: true
    pub pass_through_unknown_fields: bool,

    /// Forget the caller's plaintext when a secret was rotated out-of-band.
    ///
    /// When disabled, rotation is still reported but the stale plaintext
    /// is kept in the reconciled document.
    /// Default: true
    pub clear_rotated_plaintext: bool,

    /// Log descriptor inconsistencies at warn level.
    ///
    /// Default: true
    pub report_descriptor_issues: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pass_through_unknown_fields: true,
            clear_rotated_plaintext: true,
            report_descriptor_issues: true,
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_config_core::EngineConfig;
    ///
    /// let config = EngineConfig::builder()
    ///     .clear_rotated_plaintext(false)
    ///     .build();
    ///
    /// assert!(!config.clear_rotated_plaintext);
    /// assert!(config.pass_through_unknown_fields);
    /// ```
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Parses a configuration from TOML text.
    ///
    /// Missing keys take their default values; unknown keys are rejected so
    /// typos do not silently fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the text is not valid TOML or
    /// contains unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_config_core::EngineConfig;
    ///
    /// let config = EngineConfig::from_toml_str("clear_rotated_plaintext = false").unwrap();
    /// assert!(!config.clear_rotated_plaintext);
    ///
    /// assert!(EngineConfig::from_toml_str("clear_rotated = false").is_err());
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::ConfigError {
            message: format!("failed to parse engine config: {e}"),
        })
    }

    /// Serializes the configuration to TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::ConfigError {
            message: format!("failed to serialize engine config: {e}"),
        })
    }
}

/// Builder for `EngineConfig`.
///
/// # Examples
///
/// ```
/// use plugin_config_core::EngineConfig;
///
/// let config = EngineConfig::builder()
///     .pass_through_unknown_fields(false)
///     .report_descriptor_issues(false)
///     .build();
///
/// assert!(!config.pass_through_unknown_fields);
/// assert!(!config.report_descriptor_issues);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Creates a builder starting from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether unknown server fields are passed through.
    #[must_use]
    pub const fn pass_through_unknown_fields(mut self, enabled: bool) -> Self {
        self.config.pass_through_unknown_fields = enabled;
        self
    }

    /// Sets whether rotated secrets lose their cached plaintext.
    #[must_use]
    pub const fn clear_rotated_plaintext(mut self, enabled: bool) -> Self {
        self.config.clear_rotated_plaintext = enabled;
        self
    }

    /// Sets whether descriptor inconsistencies are logged.
    #[must_use]
    pub const fn report_descriptor_issues(mut self, enabled: bool) -> Self {
        self.config.report_descriptor_issues = enabled;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> EngineConfig {
        self.config
    }
}
