//! Engine facade.
//!
//! Every operation fetches the family's descriptor set exactly once,
//! resolves the requested class in it, and runs the pure validator or
//! reconciler against that single descriptor. Fetch failures always
//! propagate; an empty set is never substituted.

use plugin_config_core::traits::DescriptorSource;
use plugin_config_core::{ClassName, Descriptor, EngineConfig, PluginFamily, Result};
use plugin_config_secrets::{FingerprintLedger, ReconcileOptions, Reconciliation};
use plugin_config_validator::{ValidationReport, class_names, resolve};
use serde_json::Value;

/// Descriptor-driven validation and reconciliation.
///
/// # Examples
///
/// ```
/// use plugin_config_core::{ClassName, ConfigField, Descriptor, PluginFamily};
/// use plugin_config_engine::{ConfigEngine, StaticDescriptorSource};
/// use plugin_config_secrets::FingerprintLedger;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> plugin_config_core::Result<()> {
/// let source = StaticDescriptorSource::new().with_family(
///     "siteAuthenticators",
///     vec![Descriptor::new("X", "X", vec![ConfigField::concealed("password", true)])],
/// );
/// let engine = ConfigEngine::new(source);
/// let family = PluginFamily::new("siteAuthenticators");
/// let class = ClassName::new("X");
///
/// engine.check(&family, &class, &json!({"password": "secret1"})).await?;
///
/// let outcome = engine
///     .reconcile(
///         &family,
///         &class,
///         &json!({"password": "secret1"}),
///         &json!({"password": {"fingerprint": "f1"}}),
///         &FingerprintLedger::new(),
///     )
///     .await?;
/// assert_eq!(outcome.document, json!({"password": {"value": "secret1"}}));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigEngine<S> {
    source: S,
    config: EngineConfig,
}

impl<S: DescriptorSource> ConfigEngine<S> {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_config(source, EngineConfig::default())
    }

    /// Creates an engine with a custom configuration.
    #[must_use]
    pub const fn with_config(source: S, config: EngineConfig) -> Self {
        Self { source, config }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the descriptor source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Validates a declared document against the class descriptor.
    ///
    /// Missing fields are reported in the returned [`ValidationReport`],
    /// not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptors cannot be fetched or the class
    /// is unknown.
    pub async fn validate(
        &self,
        family: &PluginFamily,
        class_name: &ClassName,
        document: &Value,
    ) -> Result<ValidationReport> {
        let descriptors = self.fetch(family).await?;
        let descriptor = self.descriptor_for(class_name, &descriptors)?;
        let report = ValidationReport::new(
            class_name.clone(),
            plugin_config_validator::validate(descriptor, document),
        );

        tracing::debug!(
            "Validated {} configuration: {} violation(s)",
            class_name,
            report.violations.len()
        );
        Ok(report)
    }

    /// Validates a declared document, failing on any missing field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequiredFieldsMissing`](plugin_config_core::Error::RequiredFieldsMissing)
    /// carrying every violation, or any error [`validate`](Self::validate)
    /// returns.
    pub async fn check(
        &self,
        family: &PluginFamily,
        class_name: &ClassName,
        document: &Value,
    ) -> Result<()> {
        self.validate(family, class_name, document)
            .await?
            .into_result()
    }

    /// Reconciles the caller's prior document with the server's.
    ///
    /// `ledger` holds the fingerprints returned by the previous call; the
    /// result carries the ledger to persist for the next one.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptors cannot be fetched or the class
    /// is unknown.
    pub async fn reconcile(
        &self,
        family: &PluginFamily,
        class_name: &ClassName,
        prior: &Value,
        server: &Value,
        ledger: &FingerprintLedger,
    ) -> Result<Reconciliation> {
        let descriptors = self.fetch(family).await?;
        let descriptor = self.descriptor_for(class_name, &descriptors)?;
        let options = ReconcileOptions::from(&self.config);

        let outcome =
            plugin_config_secrets::reconcile_with_ledger(descriptor, prior, server, ledger, &options);

        if outcome.has_rotation() {
            tracing::info!(
                "Configuration of {} drifted externally: {} secret(s) rotated",
                class_name,
                outcome.rotated_paths().len()
            );
        }
        Ok(outcome)
    }

    /// Returns `document` with every concealed plaintext redacted.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptors cannot be fetched or the class
    /// is unknown.
    pub async fn redact(
        &self,
        family: &PluginFamily,
        class_name: &ClassName,
        document: &Value,
    ) -> Result<Value> {
        let descriptors = self.fetch(family).await?;
        let descriptor = self.descriptor_for(class_name, &descriptors)?;
        Ok(plugin_config_secrets::redact(descriptor, document))
    }

    /// Lists the class names published for `family`, in server order.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptors cannot be fetched.
    pub async fn classes(&self, family: &PluginFamily) -> Result<Vec<ClassName>> {
        let descriptors = self.fetch(family).await?;
        Ok(class_names(&descriptors))
    }

    async fn fetch(&self, family: &PluginFamily) -> Result<Vec<Descriptor>> {
        match self.source.descriptors(family).await {
            Ok(descriptors) => {
                tracing::debug!("Fetched {} descriptor(s) for {}", descriptors.len(), family);
                Ok(descriptors)
            }
            Err(e) => {
                tracing::warn!("Descriptor fetch for {} failed: {}", family, e);
                Err(e)
            }
        }
    }

    fn descriptor_for<'a>(
        &self,
        class_name: &ClassName,
        descriptors: &'a [Descriptor],
    ) -> Result<&'a Descriptor> {
        let descriptor = resolve(class_name, descriptors)?;

        if self.config.report_descriptor_issues {
            for issue in descriptor.integrity_issues() {
                tracing::warn!("Descriptor {}: {}", class_name, issue);
            }
        }
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticDescriptorSource;
    use plugin_config_core::ConfigField;
    use serde_json::json;

    fn engine(config: EngineConfig) -> ConfigEngine<StaticDescriptorSource> {
        let source = StaticDescriptorSource::new().with_family(
            "auth",
            vec![
                Descriptor::new("A", "A", vec![ConfigField::plain("host", true)]),
                Descriptor::new(
                    "B",
                    "B",
                    vec![
                        ConfigField::plain("host", true),
                        ConfigField::concealed("password", true),
                        ConfigField::new("legacy", "MYSTERY", false),
                    ],
                ),
            ],
        );
        ConfigEngine::with_config(source, config)
    }

    fn family() -> PluginFamily {
        PluginFamily::new("auth")
    }

    #[tokio::test]
    async fn test_validate_reports_without_error() {
        let report = engine(EngineConfig::default())
            .validate(&family(), &ClassName::new("B"), &json!({"host": "h"}))
            .await
            .unwrap();
        assert_eq!(report.missing_paths(), ["password"]);
    }

    #[tokio::test]
    async fn test_check_fails_with_violations() {
        let err = engine(EngineConfig::default())
            .check(&family(), &ClassName::new("B"), &json!({}))
            .await
            .unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(err.violations().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_class_lists_available() {
        let err = engine(EngineConfig::default())
            .validate(&family(), &ClassName::new("C"), &json!({}))
            .await
            .unwrap_err();
        assert!(err.is_unknown_class());
        assert!(err.to_string().contains("A, B"));
    }

    #[tokio::test]
    async fn test_unknown_family_propagates() {
        let err = engine(EngineConfig::default())
            .redact(&PluginFamily::new("nope"), &ClassName::new("A"), &json!({}))
            .await
            .unwrap_err();
        assert!(err.is_unknown_family());
    }

    #[tokio::test]
    async fn test_reconcile_honors_config() {
        let config = EngineConfig::builder()
            .pass_through_unknown_fields(false)
            .clear_rotated_plaintext(false)
            .build();
        let mut ledger = FingerprintLedger::new();
        ledger.insert("password".into(), "abc".into());

        let outcome = engine(config)
            .reconcile(
                &family(),
                &ClassName::new("B"),
                &json!({"password": "p"}),
                &json!({"host": "h", "password": {"fingerprint": "xyz"}, "extra": 1}),
                &ledger,
            )
            .await
            .unwrap();

        assert!(outcome.has_rotation());
        assert_eq!(
            outcome.document,
            json!({"host": "h", "password": {"value": "p"}})
        );
    }

    #[tokio::test]
    async fn test_redact() {
        let redacted = engine(EngineConfig::default())
            .redact(
                &family(),
                &ClassName::new("B"),
                &json!({"host": "h", "password": "hunter2"}),
            )
            .await
            .unwrap();
        assert_eq!(redacted, json!({"host": "h", "password": "[REDACTED]"}));
    }

    #[tokio::test]
    async fn test_classes() {
        let classes = engine(EngineConfig::default())
            .classes(&family())
            .await
            .unwrap();
        assert_eq!(classes, [ClassName::new("A"), ClassName::new("B")]);
    }
}
