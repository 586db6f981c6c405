//! Render-time kernel for Cadenza: clock, observers and parameter scheduling.
//!
//! # Primary API
//!
//! - [`RenderEngine`] / [`RenderEngineBuilder`]: reference engine
//! - [`RenderDriver`]: render-thread half, one `process()` per audio buffer
//! - [`RenderHost`]: the engine interface automation is written against
//! - [`RenderObserverList`]: lock-free per-cycle callbacks with index tokens
//! - [`RenderClock`] / [`RenderClockSnapshot`]: last render timestamp
//! - [`HostTimeBase`]: host tick ↔ second ↔ sample conversion
//!
//! # Example
//!
//! ```
//! use cadenza_core::prelude::*;
//!
//! let engine = RenderEngine::builder()
//!     .sample_rate(48000.0)
//!     .parameter(ParameterAddress(0x10), ParameterRange::unit())
//!     .build()?;
//!
//! // Audio thread
//! let mut driver = engine.take_driver()?;
//! driver.process(512, Some(HostTime::now()))?;
//!
//! assert_eq!(engine.render_clock().last_render_sample_time(), Some(0));
//! # Ok::<(), cadenza_core::Error>(())
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod compat;

pub(crate) mod lockfree;
pub use lockfree::{AtomicFlag, AtomicFloat};

mod config;
pub use config::EngineConfig;

mod time;
pub use time::{
    samples_between_host_times, samples_for_seconds, HostTime, HostTimeBase, SampleTime,
};

mod clock;
pub use clock::{RenderClock, RenderClockSnapshot};

mod schedule;
pub use schedule::{
    schedule_queue, ParameterAddress, ParameterSink, ScheduleConsumer, ScheduleProducer,
    ScheduledParameterEvent,
};

mod observer;
pub use observer::{ObserverToken, RenderCycle, RenderObserver, RenderObserverList};

pub mod parameter;
pub use parameter::{ParameterRamp, ParameterRange, ParameterTree};

mod host;
pub use host::RenderHost;

mod engine;
pub use engine::{RenderDriver, RenderEngine, RenderEngineBuilder};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{
        HostTime, HostTimeBase, ObserverToken, ParameterAddress, ParameterRange, ParameterSink,
        RenderClockSnapshot, RenderCycle, RenderEngine, RenderHost, RenderObserver, SampleTime,
        ScheduledParameterEvent,
    };
}
