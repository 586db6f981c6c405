//! Render clock shared between the render thread and control threads.
//!
//! The render thread publishes the timestamp of each cycle; control threads
//! take a [`RenderClockSnapshot`] to anchor automation. The snapshot is a
//! copy and goes stale as soon as the next cycle starts.

use crate::compat::{AtomicI64, AtomicU64, AtomicU8, Ordering};
use crate::time::{HostTime, SampleTime};
use core::sync::atomic::fence;
use serde::{Deserialize, Serialize};

const SAMPLE_TIME_VALID: u8 = 0b01;
const HOST_TIME_VALID: u8 = 0b10;

/// Point-in-time copy of the engine's last render timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderClockSnapshot {
    pub sample_time: SampleTime,
    pub sample_time_valid: bool,
    pub host_time: HostTime,
    pub host_time_valid: bool,
    pub sample_rate: f64,
}

impl RenderClockSnapshot {
    /// Engine has not rendered yet.
    pub fn invalid(sample_rate: f64) -> Self {
        Self {
            sample_time: 0,
            sample_time_valid: false,
            host_time: HostTime::default(),
            host_time_valid: false,
            sample_rate,
        }
    }

    /// Sample time only, as produced by manual rendering.
    pub fn sample(sample_time: SampleTime, sample_rate: f64) -> Self {
        Self {
            sample_time,
            sample_time_valid: true,
            ..Self::invalid(sample_rate)
        }
    }

    /// Both clocks valid, as produced by a hardware-paced render cycle.
    pub fn with_host_time(sample_time: SampleTime, host_time: HostTime, sample_rate: f64) -> Self {
        Self {
            sample_time,
            sample_time_valid: true,
            host_time,
            host_time_valid: true,
            sample_rate,
        }
    }

    /// Sample time of the last render cycle, if the render clock is running.
    #[inline]
    pub fn last_render_sample_time(&self) -> Option<SampleTime> {
        self.sample_time_valid.then_some(self.sample_time)
    }

    #[inline]
    pub fn host_time(&self) -> Option<HostTime> {
        self.host_time_valid.then_some(self.host_time)
    }
}

/// Lock-free render clock.
///
/// A sequence counter guards the `(sample_time, host_time, flags)` tuple so
/// readers never observe a sample time paired with another cycle's host
/// time. Writers are the render cycle and engine mode changes; a write is
/// three relaxed stores, so a reader retries at most briefly.
#[derive(Debug)]
pub struct RenderClock {
    sequence: AtomicU64,
    sample_time: AtomicI64,
    host_time: AtomicU64,
    flags: AtomicU8,
    sample_rate: f64,
}

impl RenderClock {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sequence: AtomicU64::new(0),
            sample_time: AtomicI64::new(0),
            host_time: AtomicU64::new(0),
            flags: AtomicU8::new(0),
            sample_rate,
        }
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Record the timestamp of the cycle about to render. RT-safe.
    #[inline]
    pub fn publish(&self, sample_time: SampleTime, host_time: Option<HostTime>) {
        let flags = match host_time {
            Some(_) => SAMPLE_TIME_VALID | HOST_TIME_VALID,
            None => SAMPLE_TIME_VALID,
        };
        self.write(sample_time, host_time.unwrap_or_default().0, flags);
    }

    /// Mark both clocks invalid (engine stopped or reset).
    pub fn invalidate(&self) {
        self.write(0, 0, 0);
    }

    /// Consistent copy of the last published timestamp.
    pub fn snapshot(&self) -> RenderClockSnapshot {
        loop {
            let before = self.sequence.load(Ordering::Acquire);
            if before & 1 == 1 {
                core::hint::spin_loop();
                continue;
            }

            let sample_time = self.sample_time.load(Ordering::Relaxed);
            let host_time = self.host_time.load(Ordering::Relaxed);
            let flags = self.flags.load(Ordering::Relaxed);

            fence(Ordering::Acquire);
            if self.sequence.load(Ordering::Relaxed) == before {
                return RenderClockSnapshot {
                    sample_time,
                    sample_time_valid: flags & SAMPLE_TIME_VALID != 0,
                    host_time: HostTime(host_time),
                    host_time_valid: flags & HOST_TIME_VALID != 0,
                    sample_rate: self.sample_rate,
                };
            }
        }
    }

    #[inline]
    fn write(&self, sample_time: SampleTime, host_time: u64, flags: u8) {
        // Odd sequence marks a write in progress.
        let mut seq = self.sequence.load(Ordering::Relaxed);
        loop {
            if seq & 1 == 1 {
                core::hint::spin_loop();
                seq = self.sequence.load(Ordering::Relaxed);
                continue;
            }
            match self.sequence.compare_exchange_weak(
                seq,
                seq.wrapping_add(1),
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => seq = current,
            }
        }
        fence(Ordering::Release);

        self.sample_time.store(sample_time, Ordering::Relaxed);
        self.host_time.store(host_time, Ordering::Relaxed);
        self.flags.store(flags, Ordering::Relaxed);

        self.sequence.store(seq.wrapping_add(2), Ordering::Release);
    }
}
