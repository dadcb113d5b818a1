//! Class resolution and required-field validation.
//!
//! Before a declared configuration is submitted to the server, it is
//! checked against the descriptor of its plugin class:
//!
//! 1. [`resolve`] picks the descriptor whose class name matches exactly.
//! 2. [`validate`] walks the descriptor, recursing into composite fields,
//!    and reports every required field path missing from the document.
//!
//! Validation never stops at the first problem. All violations for one
//! document are returned together, in descriptor order.
//!
//! # Examples
//!
//! ```
//! use plugin_config_core::{ClassName, ConfigField, Descriptor};
//! use plugin_config_validator::validate_class;
//! use serde_json::json;
//!
//! let descriptors = vec![Descriptor::new(
//!     "X",
//!     "X",
//!     vec![ConfigField::concealed("password", true)],
//! )];
//!
//! let report = validate_class(&ClassName::new("X"), &descriptors, &json!({})).unwrap();
//! assert!(!report.is_valid());
//! assert_eq!(report.violations[0].path.to_string(), "password");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod resolver;
pub mod validator;

pub use resolver::{class_names, resolve};
pub use validator::{ValidationReport, validate, validate_class};
