//! Plugin configuration engine.
//!
//! Ties the descriptor source, the validator and the secret reconciler
//! together behind one facade, [`ConfigEngine`]. The engine is
//! stateless apart from its configuration; the caller persists the
//! reconciled document and the fingerprint ledger between calls.
//!
//! # Architecture
//!
//! - [`ConfigEngine`] fetches descriptors once per operation and runs the
//!   pure validation and reconciliation functions
//! - [`StaticDescriptorSource`] serves descriptors from memory
//! - [`CachingDescriptorSource`] is an opt-in LRU decorator for any source
//!
//! # Logging
//!
//! The engine emits `tracing` events and installs no subscriber. Plaintext
//! secrets are never logged; use [`ConfigEngine::redact`] before logging a
//! declared document yourself.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod cache;
pub mod engine;
pub mod source;

pub use cache::{CacheStats, CachingDescriptorSource};
pub use engine::ConfigEngine;
pub use source::StaticDescriptorSource;
