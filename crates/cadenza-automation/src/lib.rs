//! Sample-accurate parameter automation on top of `cadenza-core`.
//!
//! A curve is a list of [`AutomationEvent`]s with start times relative to an
//! origin. [`AutomatedParameter::automate`] resolves a [`TimeAnchor`] to that
//! origin against the engine's last render time, then registers an
//! [`AutomationObserver`] that feeds each event to the engine in the render
//! cycle where it falls due.
//!
//! ```
//! use cadenza_automation::{AutomatedParameter, AutomationEvent, TimeAnchor};
//! use cadenza_core::prelude::*;
//! use std::sync::Arc;
//!
//! let engine = Arc::new(
//!     RenderEngine::builder()
//!         .sample_rate(8000.0)
//!         .parameter(ParameterAddress(1), ParameterRange::unit())
//!         .build()?,
//! );
//! engine.enable_manual_rendering(0)?;
//!
//! let mut cutoff = AutomatedParameter::new(engine.clone(), ParameterAddress(1));
//! cutoff.ramp(1.0, 0.1, 0.0)?;
//! assert!(cutoff.is_automating());
//!
//! for _ in 0..4 {
//!     engine.render_offline(256)?;
//! }
//! assert_eq!(engine.parameter_value(ParameterAddress(1)), Some(1.0));
//!
//! cutoff.stop_automation();
//! assert_eq!(engine.observer_count(), 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub use error::{AutomationError, Result};

mod anchor;
pub use anchor::{
    last_render_sample_time, resolve_origin, resolve_origin_for, RenderMode, TimeAnchor,
};

mod event;
pub use event::AutomationEvent;

mod observer;
pub use observer::AutomationObserver;

mod session;
pub use session::AutomationSession;

mod parameter;
pub use parameter::AutomatedParameter;
