//! Runtime configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the script frame loop.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Target frames per second.
    pub frame_rate: f64,
    /// Maximum number of frames to run (0 = unlimited).
    pub max_frames: u64,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            max_frames: 0,
            log_filter: "info".to_string(),
        }
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    #[must_use]
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = max_frames;
        self
    }

    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Duration of one frame. Non-positive rates fall back to 60 Hz.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        let rate = if self.frame_rate.is_finite() && self.frame_rate > 0.0 {
            self.frame_rate
        } else {
            60.0
        };
        Duration::from_secs_f64(1.0 / rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.frame_rate, 60.0);
        assert_eq!(config.max_frames, 0);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_from_json_partial() {
        let config = RuntimeConfig::from_json(r#"{ "max_frames": 120 }"#).unwrap();
        assert_eq!(config.max_frames, 120);
        assert_eq!(config.frame_rate, 60.0);
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(RuntimeConfig::from_json("{ frame_rate: }").is_err());
    }

    #[test]
    fn test_builders() {
        let config = RuntimeConfig::new()
            .with_frame_rate(30.0)
            .with_max_frames(3)
            .with_log_filter("debug");
        assert_eq!(config.frame_duration(), Duration::from_secs_f64(1.0 / 30.0));
        assert_eq!(config.max_frames, 3);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_bad_frame_rate_falls_back() {
        let config = RuntimeConfig::new().with_frame_rate(0.0);
        assert_eq!(config.frame_duration(), Duration::from_secs_f64(1.0 / 60.0));
    }
}
