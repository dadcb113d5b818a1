//! Core types, traits, and errors for plugin configuration handling.
//!
//! This crate provides the foundational types shared by the validator,
//! the secret reconciler, and the engine facade.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong domain types (`ClassName`, `PluginFamily`, `FieldPath`)
//! - The descriptor model (`Descriptor`, `ConfigField`) and its wire format
//! - Error hierarchy with contextual information
//! - The `DescriptorSource` capability trait
//! - Engine configuration types

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod descriptor;
mod error;
mod types;

pub mod traits;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use descriptor::{
    ConfigField, Descriptor, DescriptorIssue, DescriptorIssueKind, FieldBehavior, FieldKind,
    parse_descriptor_set,
};
pub use error::{Error, Result, UnknownClassError};
pub use types::{ClassName, FieldPath, FieldViolation, PluginFamily};
