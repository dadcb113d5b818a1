//! In-memory descriptor source.

use async_trait::async_trait;
use plugin_config_core::traits::DescriptorSource;
use plugin_config_core::{Descriptor, Error, PluginFamily, Result, parse_descriptor_set};
use std::collections::HashMap;

/// Descriptor source backed by a fixed map of plugin families.
///
/// Useful for tests, for hosts that ship descriptors with their binary,
/// and for replaying a descriptor set captured from the server.
///
/// # Examples
///
/// ```
/// use plugin_config_core::traits::DescriptorSource;
/// use plugin_config_core::{ConfigField, Descriptor, PluginFamily};
/// use plugin_config_engine::StaticDescriptorSource;
///
/// # #[tokio::main]
/// # async fn main() -> plugin_config_core::Result<()> {
/// let source = StaticDescriptorSource::new().with_family(
///     "siteAuthenticators",
///     vec![Descriptor::new("X", "X", vec![ConfigField::concealed("password", true)])],
/// );
///
/// let descriptors = source.descriptors(&PluginFamily::new("siteAuthenticators")).await?;
/// assert_eq!(descriptors.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticDescriptorSource {
    families: HashMap<PluginFamily, Vec<Descriptor>>,
}

impl StaticDescriptorSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the descriptor set of a family.
    #[must_use]
    pub fn with_family(
        mut self,
        family: impl Into<PluginFamily>,
        descriptors: Vec<Descriptor>,
    ) -> Self {
        self.insert(family, descriptors);
        self
    }

    /// Adds a family from the JSON the server returns for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDescriptor`] if `json` is not a descriptor
    /// set.
    pub fn with_family_json(self, family: impl Into<PluginFamily>, json: &str) -> Result<Self> {
        let descriptors = parse_descriptor_set(json)?;
        Ok(self.with_family(family, descriptors))
    }

    /// Adds (or replaces) the descriptor set of a family, returning the
    /// previous set.
    pub fn insert(
        &mut self,
        family: impl Into<PluginFamily>,
        descriptors: Vec<Descriptor>,
    ) -> Option<Vec<Descriptor>> {
        self.families.insert(family.into(), descriptors)
    }

    /// Returns the number of families known to this source.
    #[must_use]
    pub fn family_count(&self) -> usize {
        self.families.len()
    }
}

#[async_trait]
impl DescriptorSource for StaticDescriptorSource {
    async fn descriptors(&self, family: &PluginFamily) -> Result<Vec<Descriptor>> {
        self.families
            .get(family)
            .cloned()
            .ok_or_else(|| Error::UnknownFamily {
                family: family.clone(),
            })
    }
}
