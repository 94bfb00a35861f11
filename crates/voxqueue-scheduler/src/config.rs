//! Scheduler configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning for the batch scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Ratio of generation wall time to produced audio duration, used for ETA.
    pub eta_calibration_factor: f64,
    /// Deadline for a single generation, in seconds. Unset means no deadline.
    pub generation_timeout_secs: Option<f64>,
}

impl QueueConfig {
    /// Default ETA calibration factor (generation takes about twice the audio length).
    pub const DEFAULT_ETA_CALIBRATION: f64 = 2.0;

    /// Sets the per-item generation deadline.
    #[must_use]
    pub const fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout_secs = Some(timeout.as_secs_f64());
        self
    }

    /// Sets the ETA calibration factor.
    #[must_use]
    pub const fn with_eta_calibration(mut self, factor: f64) -> Self {
        self.eta_calibration_factor = factor;
        self
    }

    /// Returns the per-item generation deadline, if one is configured.
    ///
    /// Non-positive values, and values too large for a [`Duration`], are
    /// treated as unset.
    #[must_use]
    pub fn generation_timeout(&self) -> Option<Duration> {
        self.generation_timeout_secs
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            eta_calibration_factor: Self::DEFAULT_ETA_CALIBRATION,
            generation_timeout_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QueueConfig::default();
        assert!((config.eta_calibration_factor - 2.0).abs() < f64::EPSILON);
        assert!(config.generation_timeout().is_none());
    }

    #[test]
    fn test_generation_timeout() {
        let config = QueueConfig::default().with_generation_timeout(Duration::from_millis(1500));
        assert_eq!(config.generation_timeout(), Some(Duration::from_millis(1500)));

        let config = QueueConfig {
            generation_timeout_secs: Some(0.0),
            ..QueueConfig::default()
        };
        assert!(config.generation_timeout().is_none());
    }

    #[test]
    fn test_out_of_range_timeout_is_unset() {
        for secs in [1e20, f64::MAX, f64::INFINITY, f64::NAN, -5.0] {
            let config = QueueConfig {
                generation_timeout_secs: Some(secs),
                ..QueueConfig::default()
            };
            assert!(config.generation_timeout().is_none(), "{secs}");
        }
    }

    #[test]
    fn test_partial_deserialize() {
        let config: QueueConfig =
            serde_json::from_str(r#"{"generation_timeout_secs": 30}"#).unwrap();
        assert_eq!(config.generation_timeout(), Some(Duration::from_secs(30)));
        assert!((config.eta_calibration_factor - 2.0).abs() < f64::EPSILON);
    }
}
