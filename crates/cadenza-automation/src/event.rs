//! Automation curve events.

use cadenza_core::{samples_for_seconds, SampleTime};
use serde::{Deserialize, Serialize};

/// One point of an automation curve.
///
/// Times are seconds relative to the session origin. A curve is a slice of
/// events in the order the caller wrote them; that order is kept as-is all
/// the way to the engine, so events sharing a start time apply in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutomationEvent {
    pub target_value: f32,
    pub start_time: f64,
    /// Zero jumps straight to `target_value`.
    pub ramp_duration: f64,
}

impl AutomationEvent {
    pub fn new(target_value: f32, start_time: f64, ramp_duration: f64) -> Self {
        Self {
            target_value,
            start_time,
            ramp_duration,
        }
    }

    /// Set `target_value` at `start_time` without ramping.
    pub fn jump(target_value: f32, start_time: f64) -> Self {
        Self::new(target_value, start_time, 0.0)
    }

    /// Start offset from the origin in samples. Negative or NaN start times
    /// count as the origin itself.
    #[inline]
    pub fn start_offset(&self, sample_rate: f64) -> SampleTime {
        samples_for_seconds(self.start_time.max(0.0), sample_rate)
    }

    /// Ramp length in whole samples, saturating at `u32::MAX`.
    #[inline]
    pub fn ramp_frames(&self, sample_rate: f64) -> u32 {
        samples_for_seconds(self.ramp_duration.max(0.0), sample_rate).clamp(0, u32::MAX as i64)
            as u32
    }
}
