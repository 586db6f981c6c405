//! Automatable parameter handle.

use crate::anchor::{resolve_origin_for, TimeAnchor};
use crate::error::Result;
use crate::event::AutomationEvent;
use crate::session::AutomationSession;
use cadenza_core::{ParameterAddress, RenderHost, SampleTime};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A parameter that can be driven by automation curves.
///
/// Owns at most one running session. Starting new automation always stops
/// the previous session first, so an engine never holds two observers for
/// the same handle. Dropping the handle stops its automation.
pub struct AutomatedParameter {
    address: ParameterAddress,
    host: Arc<dyn RenderHost>,
    session: Option<AutomationSession>,
}

impl AutomatedParameter {
    pub fn new(host: Arc<dyn RenderHost>, address: ParameterAddress) -> Self {
        Self {
            address,
            host,
            session: None,
        }
    }

    #[inline]
    pub fn address(&self) -> ParameterAddress {
        self.address
    }

    /// Play `events` starting at `anchor`.
    ///
    /// Any running automation is stopped before the new curve is installed,
    /// including when registration of the new curve fails. An empty curve
    /// just cancels.
    ///
    /// # Example
    ///
    /// ```
    /// use cadenza_automation::{AutomatedParameter, AutomationEvent, TimeAnchor};
    /// use cadenza_core::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let engine = Arc::new(
    ///     RenderEngine::builder()
    ///         .parameter(ParameterAddress(7), ParameterRange::unit())
    ///         .build()?,
    /// );
    /// engine.enable_manual_rendering(0)?;
    ///
    /// let mut gain = AutomatedParameter::new(engine.clone(), ParameterAddress(7));
    /// gain.automate(
    ///     &[AutomationEvent::jump(0.0, 0.0), AutomationEvent::new(1.0, 0.01, 0.0)],
    ///     TimeAnchor::Unspecified,
    /// )?;
    ///
    /// engine.render_offline(1024)?;
    /// assert_eq!(engine.parameter_value(ParameterAddress(7)), Some(1.0));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn automate(&mut self, events: &[AutomationEvent], anchor: TimeAnchor) -> Result<()> {
        let origin = resolve_origin_for(self.host.as_ref(), anchor);
        let sample_rate = self.host.sample_rate();
        self.start_session(events, origin, sample_rate)
    }

    /// Ramp to `target` over `duration` seconds, beginning `delay` seconds
    /// after the next render cycle.
    pub fn ramp(&mut self, target: f32, duration: f64, delay: f64) -> Result<()> {
        self.automate(
            &[AutomationEvent::new(target, delay, duration)],
            TimeAnchor::Unspecified,
        )
    }

    /// Stop any running automation. No-op when idle.
    pub fn stop_automation(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop(self.host.as_ref());
        }
    }

    #[inline]
    pub fn is_automating(&self) -> bool {
        self.session.as_ref().is_some_and(AutomationSession::is_active)
    }

    #[inline]
    pub fn session(&self) -> Option<&AutomationSession> {
        self.session.as_ref()
    }

    fn start_session(
        &mut self,
        events: &[AutomationEvent],
        origin: SampleTime,
        sample_rate: f64,
    ) -> Result<()> {
        if self.session.is_some() {
            debug!("Replacing automation on {}", self.address);
        }
        self.stop_automation();

        let session =
            AutomationSession::start(self.host.as_ref(), self.address, events, origin, sample_rate)?;
        if session.is_active() {
            self.session = Some(session);
        }
        Ok(())
    }
}

impl Drop for AutomatedParameter {
    fn drop(&mut self) {
        self.stop_automation();
    }
}

impl fmt::Debug for AutomatedParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutomatedParameter")
            .field("address", &self.address)
            .field("session", &self.session)
            .finish()
    }
}
