//! Per-cycle render observers.
//!
//! Control threads register observers; the render thread calls every live
//! observer once before each cycle renders. Registration returns an
//! [`ObserverToken`] (slot index + generation) used later for removal.
//!
//! # RT Safety
//!
//! - `notify()`: render thread only. One `ArcSwapOption::load()` per slot,
//!   no allocation, no locks.
//! - `add()` / `remove()` / `close()`: control threads. Serialized by a mutex
//!   the render thread never touches.
//! - Removed observers are retired, not dropped. They are reclaimed on a
//!   control thread once no in-flight render cycle still holds them.

use crate::compat::{Arc, AtomicU32, AtomicUsize, Mutex, Ordering};
use crate::error::{Error, Result};
use crate::lockfree::AtomicFlag;
use crate::schedule::ParameterSink;
use crate::time::{HostTime, SampleTime};
use arc_swap::ArcSwapOption;
use tracing::debug;

/// Timestamp of the cycle about to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderCycle {
    pub sample_time: SampleTime,
    pub frames: u32,
    /// `None` in manual rendering mode.
    pub host_time: Option<HostTime>,
}

impl RenderCycle {
    /// First sample after this cycle.
    #[inline]
    pub fn end(&self) -> SampleTime {
        self.sample_time + self.frames as SampleTime
    }
}

/// Callback invoked on the render thread before each cycle.
///
/// Implementations must not block, allocate or perform I/O.
pub trait RenderObserver: Send + Sync {
    fn will_render(&self, cycle: &RenderCycle, sink: &mut dyn ParameterSink);
}

impl<F> RenderObserver for F
where
    F: Fn(&RenderCycle, &mut dyn ParameterSink) + Send + Sync,
{
    #[inline]
    fn will_render(&self, cycle: &RenderCycle, sink: &mut dyn ParameterSink) {
        self(cycle, sink)
    }
}

/// Handle for a registered observer.
///
/// Tokens outlive their registration safely: once the slot is reused the
/// generation no longer matches and removal is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverToken {
    index: u32,
    generation: u32,
}

impl ObserverToken {
    /// For [`RenderHost`](crate::RenderHost) implementations that keep
    /// their own observer registry.
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

struct ObserverEntry {
    observer: Box<dyn RenderObserver>,
}

struct ObserverSlot {
    entry: ArcSwapOption<ObserverEntry>,
    generation: AtomicU32,
}

/// Fixed-capacity list of render observers.
pub struct RenderObserverList {
    slots: Box<[ObserverSlot]>,
    /// One past the highest slot ever used; bounds the render-thread scan.
    high_water: AtomicUsize,
    active: AtomicUsize,
    closed: AtomicFlag,
    retired: Mutex<Vec<Arc<ObserverEntry>>>,
}

impl RenderObserverList {
    pub fn with_capacity(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| ObserverSlot {
                entry: ArcSwapOption::empty(),
                generation: AtomicU32::new(0),
            })
            .collect();

        Self {
            slots,
            high_water: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            closed: AtomicFlag::new(false),
            retired: Mutex::new(Vec::new()),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of registered observers.
    #[inline]
    pub fn len(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    /// Register an observer. Control thread only.
    pub fn add(&self, observer: Box<dyn RenderObserver>) -> Result<ObserverToken> {
        let mut retired = self.retired.lock();
        reclaim(&mut retired);

        if self.closed.get() {
            return Err(Error::EngineShutdown);
        }

        let (index, slot) = self
            .slots
            .iter()
            .enumerate()
            .find(|(_, slot)| slot.entry.load().is_none())
            .ok_or(Error::ObserverCapacity {
                capacity: self.slots.len(),
            })?;

        let generation = slot.generation.load(Ordering::Relaxed).wrapping_add(1);
        slot.generation.store(generation, Ordering::Release);
        slot.entry.store(Some(Arc::new(ObserverEntry { observer })));

        self.high_water.fetch_max(index + 1, Ordering::AcqRel);
        self.active.fetch_add(1, Ordering::AcqRel);

        debug!("Added render observer {} (generation {})", index, generation);

        Ok(ObserverToken {
            index: index as u32,
            generation,
        })
    }

    /// Deregister an observer. Control thread only.
    ///
    /// Returns `false` if the token was already removed or is stale.
    pub fn remove(&self, token: ObserverToken) -> bool {
        let mut retired = self.retired.lock();

        let Some(slot) = self.slots.get(token.index as usize) else {
            return false;
        };
        if slot.generation.load(Ordering::Acquire) != token.generation {
            return false;
        }
        let Some(old) = slot.entry.swap(None) else {
            return false;
        };

        self.active.fetch_sub(1, Ordering::AcqRel);
        retired.push(old);
        reclaim(&mut retired);

        debug!(
            "Removed render observer {} (generation {})",
            token.index, token.generation
        );
        true
    }

    /// Remove every observer and refuse new registrations.
    pub fn close(&self) {
        let mut retired = self.retired.lock();
        self.closed.set(true);

        for slot in self.slots.iter() {
            if let Some(old) = slot.entry.swap(None) {
                retired.push(old);
            }
        }
        self.active.store(0, Ordering::Release);
        reclaim(&mut retired);
    }

    /// Drop retired observers no render cycle still references.
    ///
    /// Returns the number still waiting on an in-flight cycle.
    pub fn reclaim(&self) -> usize {
        let mut retired = self.retired.lock();
        reclaim(&mut retired);
        retired.len()
    }

    /// Invoke every live observer. Render thread only.
    #[inline]
    pub fn notify(&self, cycle: &RenderCycle, sink: &mut dyn ParameterSink) {
        let used = self.high_water.load(Ordering::Acquire).min(self.slots.len());

        for slot in &self.slots[..used] {
            let guard = slot.entry.load();
            if let Some(entry) = guard.as_ref() {
                entry.observer.will_render(cycle, sink);
            }
        }
    }
}

fn reclaim(retired: &mut Vec<Arc<ObserverEntry>>) {
    retired.retain(|entry| Arc::strong_count(entry) > 1);
}
