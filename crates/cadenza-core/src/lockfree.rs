//! Lock-free primitives shared between control and render threads.

use crate::compat::{AtomicBool, Ordering};
use atomic_float::AtomicF32;

/// Cache-line aligned atomic f32.
///
/// Written by the render thread once per cycle, read by control threads.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFloat {
    value: AtomicF32,
}

impl AtomicFloat {
    pub fn new(value: f32) -> Self {
        Self {
            value: AtomicF32::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.value.store(value, Ordering::Release);
    }

    /// Single-writer read; only meaningful on the thread that stores.
    #[inline]
    pub fn get_relaxed(&self) -> f32 {
        self.value.load(Ordering::Relaxed)
    }

    /// Store `value` unless it is bit-identical to the current one.
    ///
    /// Idle parameters publish the same value every cycle; skipping the
    /// store keeps their cache line shared with readers. Returns whether a
    /// store happened.
    #[inline]
    pub fn publish(&self, value: f32) -> bool {
        if self.get_relaxed().to_bits() == value.to_bits() {
            return false;
        }
        self.set(value);
        true
    }
}

impl Default for AtomicFloat {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Cache-line aligned atomic bool.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }

    /// Returns the previous value.
    #[inline]
    pub fn swap(&self, value: bool) -> bool {
        self.value.swap(value, Ordering::AcqRel)
    }
}

impl Default for AtomicFlag {
    fn default() -> Self {
        Self::new(false)
    }
}
