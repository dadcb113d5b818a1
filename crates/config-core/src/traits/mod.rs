//! Core traits for plugin configuration handling.
//!
//! The engine performs no I/O of its own. Fetching descriptors from the
//! remote server is the caller's capability, injected through
//! [`DescriptorSource`]; caching and retry policy stay with the caller.
//!
//! # Examples
//!
//! ```
//! use plugin_config_core::traits::DescriptorSource;
//! use plugin_config_core::{Descriptor, PluginFamily, Result};
//! use async_trait::async_trait;
//!
//! struct FixedSource(Vec<Descriptor>);
//!
//! #[async_trait]
//! impl DescriptorSource for FixedSource {
//!     async fn descriptors(&self, _family: &PluginFamily) -> Result<Vec<Descriptor>> {
//!         Ok(self.0.clone())
//!     }
//! }
//! ```

mod source;

pub use source::DescriptorSource;
