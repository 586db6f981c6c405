//! Reference render engine.
//!
//! Owns the render clock, the observer list and the parameter tree, and
//! implements [`RenderHost`]. Rendering happens in one of two ways:
//!
//! - **Realtime**: [`RenderEngine::take_driver`] hands the [`RenderDriver`]
//!   to the audio thread, which calls [`RenderDriver::process`] once per
//!   hardware buffer with the buffer's host time.
//! - **Manual**: [`RenderEngine::enable_manual_rendering`] followed by
//!   [`RenderEngine::render_offline`] renders on the calling thread with no
//!   host clock.
//!
//! # Example
//!
//! ```
//! use cadenza_core::{ParameterAddress, ParameterRange, RenderEngine, RenderHost};
//!
//! let engine = RenderEngine::builder()
//!     .sample_rate(48000.0)
//!     .parameter(ParameterAddress(1), ParameterRange::unit())
//!     .build()?;
//!
//! engine.enable_manual_rendering(0)?;
//! engine.render_offline(512)?;
//! assert_eq!(engine.offline_sample_position(), 512);
//! # Ok::<(), cadenza_core::Error>(())
//! ```

use crate::clock::{RenderClock, RenderClockSnapshot};
use crate::compat::{Arc, AtomicI64, AtomicUsize, Mutex, Ordering};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::host::RenderHost;
use crate::lockfree::AtomicFlag;
use crate::observer::{ObserverToken, RenderCycle, RenderObserver, RenderObserverList};
use crate::parameter::{ParameterRamp, ParameterRange, ParameterTree};
use crate::schedule::{
    schedule_queue, ParameterAddress, ScheduleConsumer, ScheduleProducer, ScheduledParameterEvent,
};
use crate::time::{HostTime, HostTimeBase, SampleTime};
use tracing::{debug, info};

struct EngineShared {
    config: EngineConfig,
    clock: RenderClock,
    observers: RenderObserverList,
    parameters: Arc<ParameterTree>,
    manual: AtomicFlag,
    manual_position: AtomicI64,
    dropped: Arc<AtomicUsize>,
}

/// Audio engine core: clock, observers and parameters.
pub struct RenderEngine {
    shared: Arc<EngineShared>,
    driver: Mutex<Option<RenderDriver>>,
}

impl RenderEngine {
    pub fn builder() -> RenderEngineBuilder {
        RenderEngineBuilder::default()
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    pub fn parameters(&self) -> &Arc<ParameterTree> {
        &self.shared.parameters
    }

    /// Last value the render thread published for `address`.
    pub fn parameter_value(&self, address: ParameterAddress) -> Option<f32> {
        self.shared.parameters.value(address)
    }

    /// Scheduled events lost to a full queue since the engine was built.
    pub fn dropped_events(&self) -> usize {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    pub fn observer_count(&self) -> usize {
        self.shared.observers.len()
    }

    /// Hand the render driver to the realtime audio thread.
    ///
    /// Fails if it was already taken or manual rendering is active.
    pub fn take_driver(&self) -> Result<RenderDriver> {
        if self.shared.manual.get() {
            return Err(Error::ManualModeActive);
        }
        let driver = self.driver.lock().take().ok_or(Error::DriverTaken)?;
        debug!("Render driver handed to realtime thread");
        Ok(driver)
    }

    /// Switch to manual rendering starting at `start`.
    ///
    /// The render clock becomes invalid until the first offline cycle, so
    /// automation requested in between anchors to the offline position.
    pub fn enable_manual_rendering(&self, start: SampleTime) -> Result<()> {
        let mut driver = self.driver.lock();
        let driver = driver.as_mut().ok_or(Error::DriverTaken)?;

        driver.relocate(start);
        self.shared.manual_position.store(start, Ordering::Release);
        self.shared.clock.invalidate();
        self.shared.manual.set(true);

        debug!("Manual rendering enabled at sample {}", start);
        Ok(())
    }

    pub fn disable_manual_rendering(&self) {
        if self.shared.manual.swap(false) {
            self.shared.clock.invalidate();
            debug!("Manual rendering disabled");
        }
    }

    /// Render one cycle on the calling thread.
    pub fn render_offline(&self, frames: u32) -> Result<()> {
        if !self.shared.manual.get() {
            return Err(Error::NotInManualMode);
        }
        let mut driver = self.driver.lock();
        let driver = driver.as_mut().ok_or(Error::DriverTaken)?;
        driver.process(frames, None)
    }

    /// Remove all observers and refuse new ones.
    pub fn shutdown(&self) {
        if !self.shared.observers.is_closed() {
            self.shared.observers.close();
            info!("Render engine shut down");
        }
    }
}

impl Drop for RenderEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl RenderHost for RenderEngine {
    fn render_clock(&self) -> RenderClockSnapshot {
        self.shared.clock.snapshot()
    }

    fn is_offline(&self) -> bool {
        self.shared.manual.get()
    }

    fn offline_sample_position(&self) -> SampleTime {
        self.shared.manual_position.load(Ordering::Acquire)
    }

    fn sample_rate(&self) -> f64 {
        self.shared.config.sample_rate
    }

    fn host_time_base(&self) -> HostTimeBase {
        self.shared.config.host_time_base
    }

    fn add_render_observer(&self, observer: Box<dyn RenderObserver>) -> Result<ObserverToken> {
        self.shared.observers.add(observer)
    }

    fn remove_render_observer(&self, token: ObserverToken) -> bool {
        self.shared.observers.remove(token)
    }
}

/// Render-thread half of the engine.
///
/// # RT Safety
///
/// `process()` performs no allocation and takes no locks: the schedule
/// queue, pending list and ramps are all sized when the engine is built.
pub struct RenderDriver {
    shared: Arc<EngineShared>,
    producer: ScheduleProducer,
    consumer: ScheduleConsumer,
    /// Events not yet due, ordered by sample time. Never grows past its capacity.
    pending: Vec<ScheduledParameterEvent>,
    ramps: Box<[ParameterRamp]>,
    position: SampleTime,
}

impl RenderDriver {
    fn new(shared: Arc<EngineShared>) -> Self {
        let capacity = shared.config.schedule_capacity;
        let (producer, consumer) = schedule_queue(capacity, Arc::clone(&shared.dropped));
        let ramps = shared
            .parameters
            .addresses()
            .map(|address| {
                let value = shared.parameters.value(address).unwrap_or_default();
                ParameterRamp::new(value)
            })
            .collect();

        Self {
            shared,
            producer,
            consumer,
            pending: Vec::with_capacity(capacity),
            ramps,
            position: 0,
        }
    }

    /// Sample time of the next cycle.
    #[inline]
    pub fn position(&self) -> SampleTime {
        self.position
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.shared.config.sample_rate
    }

    /// Run one render cycle of `frames` samples.
    ///
    /// Publishes the cycle timestamp, lets observers schedule parameter
    /// events, applies due events sample-accurately and publishes the
    /// resulting parameter values.
    pub fn process(&mut self, frames: u32, host_time: Option<HostTime>) -> Result<()> {
        let max = self.shared.config.max_frames;
        if frames > max {
            return Err(Error::CycleTooLarge { frames, max });
        }

        let cycle = RenderCycle {
            sample_time: self.position,
            frames,
            host_time,
        };

        self.shared.clock.publish(cycle.sample_time, host_time);
        self.shared.observers.notify(&cycle, &mut self.producer);
        self.drain_schedule();
        self.apply(&cycle);

        self.position = cycle.end();
        if self.shared.manual.get() {
            self.shared
                .manual_position
                .store(self.position, Ordering::Release);
        }
        Ok(())
    }

    fn relocate(&mut self, position: SampleTime) {
        self.position = position;
        self.pending.clear();
        self.consumer.clear();
    }

    /// Move queued events into `pending`, keeping it sorted and stable.
    fn drain_schedule(&mut self) {
        while let Some(event) = self.consumer.pop() {
            if self.pending.len() == self.pending.capacity() {
                self.shared.dropped.fetch_add(1, Ordering::Relaxed);
                continue;
            }
            let at = self
                .pending
                .partition_point(|queued| queued.sample_time <= event.sample_time);
            self.pending.insert(at, event);
        }
    }

    fn apply(&mut self, cycle: &RenderCycle) {
        let parameters = &self.shared.parameters;
        let end = cycle.end();
        let mut offset = 0u32;
        let mut consumed = 0usize;

        for event in &self.pending {
            if event.sample_time >= end {
                break;
            }
            consumed += 1;

            // Late events apply at the start of the cycle.
            let due = (event.sample_time - cycle.sample_time).max(0) as u32;
            if due > offset {
                advance_all(&mut self.ramps, due - offset);
                offset = due;
            }

            if !event.value.is_finite() {
                continue;
            }
            if let Some(index) = parameters.index_of(event.address) {
                let target = parameters.range_at(index).clamp(event.value);
                self.ramps[index].begin(target, event.ramp_frames);
            }
        }

        advance_all(&mut self.ramps, cycle.frames - offset);
        self.pending.drain(..consumed);

        for (index, ramp) in self.ramps.iter().enumerate() {
            parameters.publish(index, ramp.current());
        }
    }
}

#[inline]
fn advance_all(ramps: &mut [ParameterRamp], frames: u32) {
    if frames == 0 {
        return;
    }
    for ramp in ramps.iter_mut() {
        ramp.advance(frames);
    }
}

/// Builder for [`RenderEngine`].
#[derive(Default)]
pub struct RenderEngineBuilder {
    config: EngineConfig,
    parameters: Vec<(ParameterAddress, ParameterRange)>,
}

impl RenderEngineBuilder {
    /// Replace the whole configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Default: 44100.0
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Default: 64
    pub fn observer_capacity(mut self, capacity: usize) -> Self {
        self.config.observer_capacity = capacity;
        self
    }

    /// Default: 1024
    pub fn schedule_capacity(mut self, capacity: usize) -> Self {
        self.config.schedule_capacity = capacity;
        self
    }

    /// Default: 4096
    pub fn max_frames(mut self, frames: u32) -> Self {
        self.config.max_frames = frames;
        self
    }

    /// Default: nanoseconds
    pub fn host_time_base(mut self, base: HostTimeBase) -> Self {
        self.config.host_time_base = base;
        self
    }

    /// Declare an automatable parameter.
    pub fn parameter(mut self, address: ParameterAddress, range: ParameterRange) -> Self {
        self.parameters.push((address, range));
        self
    }

    pub fn build(self) -> Result<RenderEngine> {
        self.config.validate()?;
        let parameters = ParameterTree::new(self.parameters)?;

        let shared = Arc::new(EngineShared {
            clock: RenderClock::new(self.config.sample_rate),
            observers: RenderObserverList::with_capacity(self.config.observer_capacity),
            parameters,
            manual: AtomicFlag::new(false),
            manual_position: AtomicI64::new(0),
            dropped: Arc::new(AtomicUsize::new(0)),
            config: self.config,
        });

        info!(
            "Render engine ready: {} Hz, {} parameters, {} observer slots",
            shared.config.sample_rate,
            shared.parameters.len(),
            shared.config.observer_capacity
        );

        Ok(RenderEngine {
            driver: Mutex::new(Some(RenderDriver::new(Arc::clone(&shared)))),
            shared,
        })
    }
}
