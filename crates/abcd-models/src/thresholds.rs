//! Detection thresholds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numeric cut-offs shared by every detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Thresholds {
    /// Records below this confidence never contribute evidence.
    pub confidence_threshold: f64,
    /// Length of the opening window for first-N-seconds features.
    pub early_time_seconds: f64,
    /// Minimum face box area, as a fraction of the frame, for a close-up.
    pub face_surface_threshold: f64,
    /// Minimum logo or text box area, in percent of the frame, for a large logo.
    pub logo_size_threshold: f64,
    /// Maximum average shot length for overall pacing.
    pub avg_shot_duration_seconds: f64,
    /// The first shot must end before this many milliseconds for a dynamic start.
    pub dynamic_cutoff_ms: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            early_time_seconds: 5.0,
            face_surface_threshold: 0.15,
            logo_size_threshold: 3.5,
            avg_shot_duration_seconds: 2.0,
            dynamic_cutoff_ms: 3000.0,
        }
    }
}

impl Thresholds {
    /// Create thresholds from environment variables.
    ///
    /// Unset variables keep their default; a set variable must parse as a number.
    pub fn from_env() -> Result<Self, ThresholdError> {
        let defaults = Self::default();
        let thresholds = Self {
            confidence_threshold: env_f64("ABCD_CONFIDENCE_THRESHOLD")?
                .unwrap_or(defaults.confidence_threshold),
            early_time_seconds: env_f64("ABCD_EARLY_TIME_SECONDS")?
                .unwrap_or(defaults.early_time_seconds),
            face_surface_threshold: env_f64("ABCD_FACE_SURFACE_THRESHOLD")?
                .unwrap_or(defaults.face_surface_threshold),
            logo_size_threshold: env_f64("ABCD_LOGO_SIZE_THRESHOLD")?
                .unwrap_or(defaults.logo_size_threshold),
            avg_shot_duration_seconds: env_f64("ABCD_AVG_SHOT_DURATION_SECONDS")?
                .unwrap_or(defaults.avg_shot_duration_seconds),
            dynamic_cutoff_ms: env_f64("ABCD_DYNAMIC_CUTOFF_MS")?
                .unwrap_or(defaults.dynamic_cutoff_ms),
        };

        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Reject non-finite values and values outside each field's range.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        check("confidence_threshold", self.confidence_threshold, 0.0, 1.0)?;
        check("early_time_seconds", self.early_time_seconds, 0.0, f64::MAX)?;
        check("face_surface_threshold", self.face_surface_threshold, 0.0, 1.0)?;
        check("logo_size_threshold", self.logo_size_threshold, 0.0, 100.0)?;
        check("avg_shot_duration_seconds", self.avg_shot_duration_seconds, 0.0, f64::MAX)?;
        check("dynamic_cutoff_ms", self.dynamic_cutoff_ms, 0.0, f64::MAX)?;
        Ok(())
    }

    /// True if a record with this confidence may contribute evidence.
    pub fn admits(&self, confidence: f64) -> bool {
        confidence >= self.confidence_threshold
    }
}

/// A threshold that could not be read or is out of range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    #[error("{name}: \"{value}\" is not a number")]
    Unparsable { name: String, value: String },

    #[error("{name} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

fn check(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ThresholdError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ThresholdError::OutOfRange { name, value, min, max })
    }
}

fn env_f64(key: &str) -> Result<Option<f64>, ThresholdError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ThresholdError::Unparsable {
                name: key.to_string(),
                value: raw,
            }),
        _ => Ok(None),
    }
}
