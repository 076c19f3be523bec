//! Threshold filter configuration.
//!
//! Configuration is optional; [`ThresholdConfig::default`] reproduces the
//! classic ±10% filter that fails fast on an unknown reference. Callers that
//! keep settings in TOML can parse a `[threshold]` table:
//!
//! ```toml
//! [threshold]
//! tolerance = 0.1
//! on_missing_reference = "error"   # or "empty"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, TollError};

/// Default relative band half-width (10%).
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// What to do when the reference location has no rows as a start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingReference {
    /// Fail with `TollError::ReferenceNotFound`.
    #[default]
    Error,
    /// Return an empty result and log a warning.
    Empty,
}

/// Settings for the proximity filters in [`crate::threshold`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Half-width of the band as a fraction of the reference mean.
    ///
    /// Must be finite and non-negative. Default: `0.1`
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Behavior for a reference with no outgoing rows.
    ///
    /// Default: `error`
    #[serde(default)]
    pub on_missing_reference: MissingReference,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            on_missing_reference: MissingReference::Error,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    threshold: ThresholdConfig,
}

impl ThresholdConfig {
    /// Parse the `[threshold]` table from a TOML document.
    ///
    /// A missing table or missing keys fall back to defaults; unknown tables
    /// are ignored so the section can live inside a larger config file.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: ConfigDocument = toml::from_str(content)?;
        document.threshold.validate()?;
        Ok(document.threshold)
    }

    /// Builder-style override of the tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder-style override of the missing-reference policy.
    pub fn with_missing_reference(mut self, policy: MissingReference) -> Self {
        self.on_missing_reference = policy;
        self
    }

    /// Reject tolerances that would produce a meaningless band.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(TollError::InvalidConfig {
                message: format!(
                    "tolerance must be finite and non-negative, got {}",
                    self.tolerance
                ),
            });
        }
        Ok(())
    }
}
