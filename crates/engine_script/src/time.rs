//! Per-frame elapsed time.

use std::ops::{Add, AddAssign};
use std::time::Duration;

/// Time elapsed over one frame. Never negative; may be zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameTime(Duration);

impl FrameTime {
    pub const ZERO: FrameTime = FrameTime(Duration::ZERO);

    /// Negative, NaN and infinite inputs clamp to zero.
    #[must_use]
    pub fn from_seconds(seconds: f32) -> Self {
        Duration::try_from_secs_f32(seconds.max(0.0))
            .map(Self)
            .unwrap_or(Self::ZERO)
    }

    /// Negative and NaN inputs clamp to zero.
    #[must_use]
    pub fn from_millis(millis: f32) -> Self {
        Self::from_seconds(millis * 0.001)
    }

    #[must_use]
    pub const fn from_duration(duration: Duration) -> Self {
        Self(duration)
    }

    #[must_use]
    pub fn as_seconds(self) -> f32 {
        self.0.as_secs_f32()
    }

    #[must_use]
    pub fn as_millis(self) -> f32 {
        self.0.as_secs_f32() * 1000.0
    }

    #[must_use]
    pub fn as_micros(self) -> f64 {
        self.0.as_secs_f64() * 1_000_000.0
    }

    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }
}

impl From<Duration> for FrameTime {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl Add for FrameTime {
    type Output = FrameTime;

    fn add(self, rhs: FrameTime) -> FrameTime {
        FrameTime(self.0 + rhs.0)
    }
}

impl AddAssign for FrameTime {
    fn add_assign(&mut self, rhs: FrameTime) {
        self.0 += rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversions() {
        let t = FrameTime::from_millis(250.0);
        assert!((t.as_seconds() - 0.25).abs() < 1e-6);
        assert!((t.as_millis() - 250.0).abs() < 1e-3);
        assert!((t.as_micros() - 250_000.0).abs() < 1.0);
    }

    #[test]
    fn test_negative_and_nan_clamp_to_zero() {
        assert_eq!(FrameTime::from_seconds(-1.0), FrameTime::ZERO);
        assert_eq!(FrameTime::from_seconds(f32::NAN), FrameTime::ZERO);
    }

    #[test]
    fn test_accumulate() {
        let mut total = FrameTime::ZERO;
        total += FrameTime::from_duration(Duration::from_millis(16));
        total += FrameTime::from_duration(Duration::from_millis(17));
        assert_eq!(total.as_duration(), Duration::from_millis(33));
    }
}
