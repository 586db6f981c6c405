//! Render engine configuration.

use crate::time::HostTimeBase;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the render engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub sample_rate: f64,
    /// Maximum number of simultaneously registered render observers.
    pub observer_capacity: usize,
    /// Scheduled parameter events buffered per render cycle.
    pub schedule_capacity: usize,
    /// Largest render cycle the engine accepts, in frames.
    pub max_frames: u32,
    pub host_time_base: HostTimeBase,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            observer_capacity: 64,
            schedule_capacity: 1024,
            max_frames: 4096,
            host_time_base: HostTimeBase::nanoseconds(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(8000.0..=384000.0).contains(&self.sample_rate) {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                self.sample_rate
            )));
        }
        if self.observer_capacity == 0 {
            return Err(Error::InvalidConfig(
                "observer_capacity must be at least 1".into(),
            ));
        }
        if self.schedule_capacity == 0 {
            return Err(Error::InvalidConfig(
                "schedule_capacity must be at least 1".into(),
            ));
        }
        if self.max_frames == 0 {
            return Err(Error::InvalidConfig("max_frames must be at least 1".into()));
        }
        let tps = self.host_time_base.ticks_per_second();
        if !tps.is_finite() || tps <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "host time base {} ticks/s must be positive",
                tps
            )));
        }
        Ok(())
    }
}
