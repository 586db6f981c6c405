//! Parameter storage and render-thread ramps.
//!
//! The tree is built once and never resized, so the render thread can look
//! parameters up and publish values without locking.
//!
//! # Example
//!
//! ```
//! use cadenza_core::{ParameterRamp, ParameterRange};
//!
//! let cutoff = ParameterRange::new(20.0, 20000.0, 1000.0);
//! assert_eq!(cutoff.clamp(50000.0), 20000.0);
//!
//! // Ramp from 0 to 1 over 4 samples
//! let mut ramp = ParameterRamp::new(0.0);
//! ramp.begin(1.0, 4);
//! assert_eq!(ramp.advance(2), 0.5);
//! assert_eq!(ramp.advance(2), 1.0);
//! ```

use crate::compat::Arc;
use crate::error::{Error, Result};
use crate::lockfree::AtomicFloat;
use crate::schedule::ParameterAddress;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Valid range and default value of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParameterRange {
    /// `default` is clamped into the range. Inverted bounds are rejected
    /// when the parameter tree is built.
    pub fn new(min: f32, max: f32, default: f32) -> Self {
        Self {
            min,
            max,
            default: default.max(min).min(max),
        }
    }

    /// 0.0 to 1.0, defaulting to 0.0.
    pub fn unit() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }
}

impl Default for ParameterRange {
    fn default() -> Self {
        Self::unit()
    }
}

struct ParameterSlot {
    address: ParameterAddress,
    range: ParameterRange,
    value: AtomicFloat,
}

/// Fixed set of parameters with lock-free current values.
pub struct ParameterTree {
    slots: Box<[ParameterSlot]>,
    index: HashMap<ParameterAddress, usize>,
}

impl ParameterTree {
    pub fn new(parameters: Vec<(ParameterAddress, ParameterRange)>) -> Result<Arc<Self>> {
        let mut index = HashMap::with_capacity(parameters.len());
        let mut slots = Vec::with_capacity(parameters.len());

        for (address, range) in parameters {
            if !(range.min.is_finite() && range.max.is_finite() && range.min <= range.max) {
                return Err(Error::InvalidConfig(format!(
                    "parameter {} has invalid range {}..{}",
                    address, range.min, range.max
                )));
            }
            if index.insert(address, slots.len()).is_some() {
                return Err(Error::DuplicateParameter(address.0));
            }
            slots.push(ParameterSlot {
                address,
                range,
                value: AtomicFloat::new(range.default),
            });
        }

        Ok(Arc::new(Self {
            slots: slots.into_boxed_slice(),
            index,
        }))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn index_of(&self, address: ParameterAddress) -> Option<usize> {
        self.index.get(&address).copied()
    }

    #[inline]
    pub fn contains(&self, address: ParameterAddress) -> bool {
        self.index.contains_key(&address)
    }

    /// Last value published by the render thread.
    pub fn value(&self, address: ParameterAddress) -> Option<f32> {
        self.index_of(address).map(|i| self.slots[i].value.get())
    }

    pub fn range(&self, address: ParameterAddress) -> Option<ParameterRange> {
        self.index_of(address).map(|i| self.slots[i].range)
    }

    pub fn addresses(&self) -> impl Iterator<Item = ParameterAddress> + '_ {
        self.slots.iter().map(|slot| slot.address)
    }

    #[inline]
    pub(crate) fn range_at(&self, index: usize) -> ParameterRange {
        self.slots[index].range
    }

    #[inline]
    pub(crate) fn publish(&self, index: usize, value: f32) {
        self.slots[index].value.publish(value);
    }
}

/// Linear ramp toward a scheduled target. Render-thread state.
#[derive(Debug, Clone, Copy)]
pub struct ParameterRamp {
    current: f32,
    target: f32,
    step: f32,
    remaining: u32,
}

impl ParameterRamp {
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            remaining: 0,
        }
    }

    /// Start moving toward `target`, reaching it after `frames` samples.
    /// Zero frames jumps immediately.
    #[inline]
    pub fn begin(&mut self, target: f32, frames: u32) {
        self.target = target;
        self.remaining = frames;

        if frames == 0 {
            self.current = target;
            self.step = 0.0;
        } else {
            self.step = (target - self.current) / frames as f32;
        }
    }

    /// Advance by `frames` samples and return the new value.
    #[inline]
    pub fn advance(&mut self, frames: u32) -> f32 {
        if self.remaining > 0 {
            let n = frames.min(self.remaining);
            self.current += self.step * n as f32;
            self.remaining -= n;

            // Snap to avoid accumulated drift
            if self.remaining == 0 {
                self.current = self.target;
            }
        }
        self.current
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn is_ramping(&self) -> bool {
        self.remaining > 0
    }
}
