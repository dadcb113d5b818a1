//! Descriptor source trait.
//!
//! This module defines the `DescriptorSource` trait, the seam through
//! which the engine obtains the descriptor set for a plugin family.

use crate::{Descriptor, PluginFamily, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Provides the descriptor set for a plugin family.
///
/// Implementations usually call the remote server's "get descriptors"
/// endpoint. The engine calls [`descriptors`](Self::descriptors) exactly
/// once per operation and never caches the result itself.
///
/// # Type Safety
///
/// All implementations must be `Send + Sync` to work with Tokio's async runtime.
///
/// # Examples
///
/// ```
/// use plugin_config_core::traits::DescriptorSource;
/// use plugin_config_core::{ConfigField, Descriptor, Error, PluginFamily, Result};
/// use async_trait::async_trait;
///
/// struct SiteAuthenticators;
///
/// #[async_trait]
/// impl DescriptorSource for SiteAuthenticators {
///     async fn descriptors(&self, family: &PluginFamily) -> Result<Vec<Descriptor>> {
///         if family.as_str() != "siteAuthenticators" {
///             return Err(Error::UnknownFamily { family: family.clone() });
///         }
///         Ok(vec![Descriptor::new(
///             "com.example.Basic",
///             "Basic",
///             vec![ConfigField::concealed("password", true)],
///         )])
///     }
/// }
/// ```
#[async_trait]
pub trait DescriptorSource: Send + Sync {
    /// Fetches every descriptor published for `family`, in server order.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptors cannot be obtained. Transport
    /// failures should be reported as
    /// [`Error::DescriptorFetch`](crate::Error::DescriptorFetch); callers
    /// must not substitute an empty set, which would make every concealed
    /// field look plain.
    async fn descriptors(&self, family: &PluginFamily) -> Result<Vec<Descriptor>>;
}

#[async_trait]
impl<T: DescriptorSource + ?Sized> DescriptorSource for Arc<T> {
    async fn descriptors(&self, family: &PluginFamily) -> Result<Vec<Descriptor>> {
        (**self).descriptors(family).await
    }
}

#[async_trait]
impl<T: DescriptorSource + ?Sized> DescriptorSource for Box<T> {
    async fn descriptors(&self, family: &PluginFamily) -> Result<Vec<Descriptor>> {
        (**self).descriptors(family).await
    }
}
