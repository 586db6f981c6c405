//! Host and sample time bases.
//!
//! The render domain counts samples; the control domain sees a host tick
//! counter that keeps running regardless of buffer size. Everything that
//! crosses from one to the other goes through [`HostTimeBase`].
//!
//! # Example
//!
//! ```
//! use cadenza_core::{samples_between_host_times, HostTime, HostTimeBase};
//!
//! let base = HostTimeBase::nanoseconds();
//! let from = base.host_time_for_seconds(2.0);
//! let to = base.host_time_for_seconds(2.5);
//!
//! assert_eq!(samples_between_host_times(from, to, 44100.0, &base), 22050);
//! ```

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Instant;

/// Sample index since the engine started rendering.
pub type SampleTime = i64;

/// Largest value exactly representable in an f64 mantissa.
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

/// Opaque host tick count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Current host time in nanoseconds since the first call in this process.
    ///
    /// Pairs with [`HostTimeBase::nanoseconds`].
    pub fn now() -> Self {
        static EPOCH: OnceLock<Instant> = OnceLock::new();
        let epoch = *EPOCH.get_or_init(Instant::now);
        Self(u64::try_from(epoch.elapsed().as_nanos()).unwrap_or(u64::MAX))
    }

    #[inline]
    pub fn ticks(self) -> u64 {
        self.0
    }
}

/// Conversion between host ticks and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostTimeBase {
    ticks_per_second: f64,
}

impl Default for HostTimeBase {
    fn default() -> Self {
        Self::nanoseconds()
    }
}

impl HostTimeBase {
    /// One tick per nanosecond (the base used by [`HostTime::now`]).
    pub const fn nanoseconds() -> Self {
        Self {
            ticks_per_second: 1_000_000_000.0,
        }
    }

    /// # Panics
    ///
    /// Panics in debug mode if `ticks_per_second` is not positive and finite.
    pub fn new(ticks_per_second: f64) -> Self {
        debug_assert!(
            ticks_per_second.is_finite() && ticks_per_second > 0.0,
            "ticks_per_second must be positive"
        );
        Self { ticks_per_second }
    }

    #[inline]
    pub fn ticks_per_second(&self) -> f64 {
        self.ticks_per_second
    }

    #[inline]
    pub fn seconds_for_host_time(&self, time: HostTime) -> f64 {
        time.0 as f64 / self.ticks_per_second
    }

    /// Negative seconds saturate to tick zero.
    #[inline]
    pub fn host_time_for_seconds(&self, seconds: f64) -> HostTime {
        HostTime((seconds * self.ticks_per_second).max(0.0).round() as u64)
    }

    /// Signed seconds from `from` to `to`.
    ///
    /// Computed on the tick difference, so two large absolute tick counts
    /// close to each other keep full precision.
    #[inline]
    pub fn seconds_between(&self, from: HostTime, to: HostTime) -> f64 {
        tick_delta(from, to) as f64 / self.ticks_per_second
    }
}

#[inline]
fn tick_delta(from: HostTime, to: HostTime) -> i128 {
    to.0 as i128 - from.0 as i128
}

#[inline]
fn is_integral(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value <= MAX_EXACT_F64 && value.fract() == 0.0
}

#[inline]
fn saturate(value: i128) -> SampleTime {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as SampleTime
}

/// Whole samples covered by `seconds`, floored toward negative infinity.
///
/// Non-finite input yields 0 (float-to-int casts saturate and map NaN to 0).
#[inline]
pub fn samples_for_seconds(seconds: f64, sample_rate: f64) -> SampleTime {
    (seconds * sample_rate).floor() as SampleTime
}

/// Signed sample offset from host time `from` to host time `to`, floored.
///
/// Uses exact integer division when both the sample rate and the tick rate
/// are whole numbers, so 0.5s at 44100 Hz is exactly 22050 samples.
/// Non-decreasing in `to`.
pub fn samples_between_host_times(
    from: HostTime,
    to: HostTime,
    sample_rate: f64,
    base: &HostTimeBase,
) -> SampleTime {
    let delta = tick_delta(from, to);
    let ticks_per_second = base.ticks_per_second();

    if is_integral(sample_rate) && is_integral(ticks_per_second) {
        let scaled = delta * sample_rate as i128;
        saturate(scaled.div_euclid(ticks_per_second as i128))
    } else {
        samples_for_seconds(delta as f64 / ticks_per_second, sample_rate)
    }
}
