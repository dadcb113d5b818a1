//! Out-of-band secret rotation detection.
//!
//! Drift is a secret's fingerprint changing without the caller having
//! supplied a new plaintext. The engine can tell that a secret changed but
//! can never recover what it changed to, so a rotated secret's cached
//! plaintext is treated as unknown.
//!
//! Drift is advisory. It never produces an error; callers feed it into
//! their own change detection.

use plugin_config_core::FieldPath;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fingerprint::Fingerprint;

/// Result of comparing a stored fingerprint with the server's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriftOutcome {
    /// The caller's plaintext still matches what the server holds, or there
    /// is nothing to compare against.
    Stable,
    /// The secret was changed by someone other than this caller.
    Rotated,
}

impl DriftOutcome {
    /// Returns `true` for [`DriftOutcome::Rotated`].
    #[must_use]
    pub const fn is_rotated(self) -> bool {
        matches!(self, Self::Rotated)
    }
}

impl fmt::Display for DriftOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable => f.write_str("stable"),
            Self::Rotated => f.write_str("rotated"),
        }
    }
}

/// Compares the fingerprint the caller recorded with the server's current one.
///
/// Only two present, differing fingerprints mean rotation. A missing prior
/// fingerprint is a first read, and a missing server fingerprint gives
/// nothing to compare against; both are stable.
///
/// # Examples
///
/// ```
/// use plugin_config_secrets::{DriftOutcome, Fingerprint, detect_drift};
///
/// let abc = Fingerprint::new("abc");
/// let xyz = Fingerprint::new("xyz");
///
/// assert_eq!(detect_drift(Some(&abc), Some(&xyz)), DriftOutcome::Rotated);
/// assert_eq!(detect_drift(Some(&abc), Some(&abc)), DriftOutcome::Stable);
/// assert_eq!(detect_drift(None, Some(&xyz)), DriftOutcome::Stable);
/// ```
#[must_use]
pub fn detect_drift(prior: Option<&Fingerprint>, server: Option<&Fingerprint>) -> DriftOutcome {
    match (prior, server) {
        (Some(prior), Some(server)) if prior != server => DriftOutcome::Rotated,
        _ => DriftOutcome::Stable,
    }
}

/// Drift result for one concealed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftReport {
    /// Path of the concealed field.
    pub path: FieldPath,
    /// Comparison outcome.
    pub outcome: DriftOutcome,
    /// Whether the caller held a plaintext for this field before the read.
    pub plaintext_was_known: bool,
    /// Whether the cached plaintext was discarded because of rotation.
    pub plaintext_cleared: bool,
}

impl fmt::Display for DriftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.outcome)?;
        if self.plaintext_cleared {
            f.write_str(" (cached plaintext discarded)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_read_is_stable() {
        assert_eq!(detect_drift(None, None), DriftOutcome::Stable);
        assert_eq!(
            detect_drift(None, Some(&Fingerprint::new("f1"))),
            DriftOutcome::Stable
        );
    }

    #[test]
    fn test_missing_server_fingerprint_is_stable() {
        assert_eq!(
            detect_drift(Some(&Fingerprint::new("f1")), None),
            DriftOutcome::Stable
        );
    }

    #[test]
    fn test_changed_fingerprint_is_rotated() {
        let outcome = detect_drift(Some(&Fingerprint::new("abc")), Some(&Fingerprint::new("xyz")));
        assert!(outcome.is_rotated());
        assert_eq!(outcome.to_string(), "rotated");
    }

    #[test]
    fn test_outcome_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&DriftOutcome::Rotated).unwrap(),
            "\"ROTATED\""
        );
    }

    #[test]
    fn test_report_display() {
        let report = DriftReport {
            path: FieldPath::from("auth.password"),
            outcome: DriftOutcome::Rotated,
            plaintext_was_known: true,
            plaintext_cleared: true,
        };
        assert_eq!(
            report.to_string(),
            "auth.password: rotated (cached plaintext discarded)"
        );
    }
}
