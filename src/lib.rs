//! # Cadenza - Sample-accurate parameter automation
//!
//! Schedules parameter changes into a real-time render loop at exact sample
//! positions, anchored to host time or sample time.
//!
//! ## Architecture
//!
//! Cadenza is an umbrella crate over:
//! - **cadenza-core** - Render clock, observer list, parameter tree, reference engine
//! - **cadenza-automation** - Time anchors, automation curves and sessions
//!
//! ## Quick Start
//!
//! ```
//! use cadenza::prelude::*;
//! use std::sync::Arc;
//!
//! let engine = Arc::new(
//!     RenderEngine::builder()
//!         .sample_rate(48000.0)
//!         .parameter(ParameterAddress(0x01), ParameterRange::new(20.0, 20000.0, 1000.0))
//!         .build()?,
//! );
//!
//! // Audio thread owns the driver
//! let mut driver = engine.take_driver()?;
//!
//! // Control thread
//! let mut cutoff = AutomatedParameter::new(engine.clone(), ParameterAddress(0x01));
//! cutoff.automate(
//!     &[
//!         AutomationEvent::jump(200.0, 0.0),
//!         AutomationEvent::new(8000.0, 0.01, 0.02),
//!     ],
//!     TimeAnchor::Unspecified,
//! )?;
//!
//! for _ in 0..4 {
//!     driver.process(512, Some(HostTime::now()))?;
//! }
//! assert_eq!(engine.parameter_value(ParameterAddress(0x01)), Some(8000.0));
//! # Ok::<(), cadenza::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Core engine plus automation
//! - `automation` - Automation sessions and parameters

/// Re-export of cadenza-core for direct access
pub use cadenza_core as core;

mod error;
pub use error::{Error, Result};

// Core types
pub use cadenza_core::{
    // Time
    samples_between_host_times,
    samples_for_seconds,
    HostTime,
    HostTimeBase,
    SampleTime,

    // Clock
    RenderClock,
    RenderClockSnapshot,

    // Observers
    ObserverToken,
    RenderCycle,
    RenderObserver,
    RenderObserverList,

    // Scheduling
    ParameterAddress,
    ParameterSink,
    ScheduledParameterEvent,

    // Parameters
    ParameterRamp,
    ParameterRange,
    ParameterTree,

    // Engine
    EngineConfig,
    RenderDriver,
    RenderEngine,
    RenderEngineBuilder,
    RenderHost,

    // Lock-free primitives
    AtomicFlag,
    AtomicFloat,
};

// Automation
#[cfg(feature = "automation")]
pub use cadenza_automation as automation;

#[cfg(feature = "automation")]
pub use cadenza_automation::{
    resolve_origin, resolve_origin_for, AutomatedParameter, AutomationError, AutomationEvent,
    AutomationObserver, AutomationSession, RenderMode, TimeAnchor,
};

/// Convenience prelude for common imports
pub mod prelude {
    // Engine
    pub use crate::{RenderDriver, RenderEngine, RenderEngineBuilder, RenderHost};

    // Essential types
    pub use crate::{
        HostTime, HostTimeBase, ObserverToken, ParameterAddress, ParameterRange, ParameterSink,
        RenderClockSnapshot, RenderCycle, RenderObserver, SampleTime, ScheduledParameterEvent,
    };

    // Automation
    #[cfg(feature = "automation")]
    pub use crate::automation::{AutomatedParameter, AutomationEvent, TimeAnchor};
}
