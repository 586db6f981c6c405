//! Scheduled parameter events and the sinks render observers write into.

use crate::compat::{Arc, AtomicUsize, Ordering};
use crate::time::SampleTime;
use core::fmt;
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use serde::{Deserialize, Serialize};

/// Stable identity of an automatable parameter within the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParameterAddress(pub u64);

impl fmt::Display for ParameterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A value change the engine applies at an absolute sample time.
///
/// `ramp_frames == 0` jumps to `value`; otherwise the parameter ramps
/// linearly from wherever it is at `sample_time` to `value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledParameterEvent {
    pub sample_time: SampleTime,
    pub ramp_frames: u32,
    pub address: ParameterAddress,
    pub value: f32,
}

/// Destination for events produced during a render cycle.
pub trait ParameterSink {
    /// Returns `false` if the event was dropped.
    fn schedule(&mut self, event: ScheduledParameterEvent) -> bool;
}

impl ParameterSink for Vec<ScheduledParameterEvent> {
    fn schedule(&mut self, event: ScheduledParameterEvent) -> bool {
        self.push(event);
        true
    }
}

/// Render-side producer of the bounded schedule queue.
///
/// Never blocks: when the queue is full the event is dropped and counted.
pub struct ScheduleProducer {
    inner: HeapProd<ScheduledParameterEvent>,
    dropped: Arc<AtomicUsize>,
}

impl ParameterSink for ScheduleProducer {
    #[inline]
    fn schedule(&mut self, event: ScheduledParameterEvent) -> bool {
        match self.inner.try_push(event) {
            Ok(()) => true,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }
}

/// Consumer half of the schedule queue, drained by the render driver.
pub struct ScheduleConsumer {
    inner: HeapCons<ScheduledParameterEvent>,
}

impl ScheduleConsumer {
    #[inline]
    pub fn pop(&mut self) -> Option<ScheduledParameterEvent> {
        self.inner.try_pop()
    }

    pub fn clear(&mut self) {
        while self.inner.try_pop().is_some() {}
    }
}

/// Create a bounded SPSC schedule queue.
///
/// Drops are added to `dropped`, which the caller may share for reporting.
pub fn schedule_queue(
    capacity: usize,
    dropped: Arc<AtomicUsize>,
) -> (ScheduleProducer, ScheduleConsumer) {
    let (prod, cons) = HeapRb::<ScheduledParameterEvent>::new(capacity).split();
    (
        ScheduleProducer {
            inner: prod,
            dropped,
        },
        ScheduleConsumer { inner: cons },
    )
}
