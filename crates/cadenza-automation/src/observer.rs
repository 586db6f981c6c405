//! Render-thread side of an automation session.

use crate::event::AutomationEvent;
use cadenza_core::compat::{AtomicI64, Ordering};
use cadenza_core::{
    ParameterAddress, ParameterSink, RenderCycle, RenderObserver, SampleTime,
    ScheduledParameterEvent,
};

#[derive(Debug, Clone, Copy)]
struct ScheduledPoint {
    start: SampleTime,
    ramp_frames: u32,
    value: f32,
}

/// Pushes a curve's events into the engine as their sample times come due.
///
/// Built on the control thread; sample times are computed up front so the
/// render callback only compares integers. The curve is immutable once
/// built. The only render-side state is a high-water mark of the sample
/// time already handed to the engine, which lets events that fell due
/// before the first observed cycle be applied late instead of lost.
///
/// After the last event the observer does nothing but stays registered
/// until its session is stopped.
pub struct AutomationObserver {
    address: ParameterAddress,
    points: Box<[ScheduledPoint]>,
    last_start: SampleTime,
    scheduled_through: AtomicI64,
}

impl AutomationObserver {
    pub fn new(
        address: ParameterAddress,
        origin: SampleTime,
        sample_rate: f64,
        events: &[AutomationEvent],
    ) -> Self {
        let points: Box<[ScheduledPoint]> = events
            .iter()
            .map(|event| ScheduledPoint {
                start: origin.saturating_add(event.start_offset(sample_rate)),
                ramp_frames: event.ramp_frames(sample_rate),
                value: event.target_value,
            })
            .collect();
        let last_start = points.iter().map(|p| p.start).max().unwrap_or(origin);

        Self {
            address,
            points,
            last_start,
            scheduled_through: AtomicI64::new(origin),
        }
    }

    #[inline]
    pub fn address(&self) -> ParameterAddress {
        self.address
    }

    /// Sample time of the latest event in the curve.
    #[inline]
    pub fn last_start(&self) -> SampleTime {
        self.last_start
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl RenderObserver for AutomationObserver {
    fn will_render(&self, cycle: &RenderCycle, sink: &mut dyn ParameterSink) {
        let start = cycle.sample_time;
        let end = cycle.end();
        let through = self.scheduled_through.swap(end, Ordering::Relaxed);
        let from = through.min(start);

        if from > self.last_start {
            return;
        }

        // Overdue points all land on the cycle start and each overrides the
        // one before it, so only the last of them in caller order is sent.
        let last_overdue = self
            .points
            .iter()
            .rposition(|point| point.start >= from && point.start < start);

        for (index, point) in self.points.iter().enumerate() {
            if point.start < from || point.start >= end {
                continue;
            }

            let event = if point.start < start {
                if Some(index) != last_overdue {
                    continue;
                }
                let elapsed = (start - point.start).min(u32::MAX as i64) as u32;
                ScheduledParameterEvent {
                    sample_time: start,
                    ramp_frames: point.ramp_frames.saturating_sub(elapsed),
                    address: self.address,
                    value: point.value,
                }
            } else {
                ScheduledParameterEvent {
                    sample_time: point.start,
                    ramp_frames: point.ramp_frames,
                    address: self.address,
                    value: point.value,
                }
            };
            sink.schedule(event);
        }
    }
}
