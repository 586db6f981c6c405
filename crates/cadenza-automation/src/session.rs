//! One running automation curve bound to one engine observer.

use crate::error::{AutomationError, Result};
use crate::event::AutomationEvent;
use crate::observer::AutomationObserver;
use cadenza_core::{ObserverToken, ParameterAddress, RenderHost, SampleTime};
use std::sync::Arc;
use tracing::{debug, warn};

/// A started automation curve.
///
/// Holds the observer token while active. A session built from an empty
/// curve never registers anything and is inactive from the start.
#[derive(Debug)]
pub struct AutomationSession {
    address: ParameterAddress,
    origin: SampleTime,
    sample_rate: f64,
    events: Arc<[AutomationEvent]>,
    token: Option<ObserverToken>,
}

impl AutomationSession {
    /// Register an observer that plays `events` relative to `origin`.
    pub fn start<H: RenderHost + ?Sized>(
        host: &H,
        address: ParameterAddress,
        events: &[AutomationEvent],
        origin: SampleTime,
        sample_rate: f64,
    ) -> Result<Self> {
        debug_assert!(origin >= 0, "automation origin must be non-negative");

        let events: Arc<[AutomationEvent]> = Arc::from(events);
        let mut session = Self {
            address,
            origin,
            sample_rate,
            events,
            token: None,
        };

        if session.events.is_empty() {
            return Ok(session);
        }

        let observer = AutomationObserver::new(address, origin, sample_rate, &session.events);
        match host.add_render_observer(Box::new(observer)) {
            Ok(token) => {
                debug!(
                    "Automation started on {} at sample {} ({} events)",
                    address,
                    origin,
                    session.events.len()
                );
                session.token = Some(token);
                Ok(session)
            }
            Err(err) => {
                warn!("Automation on {} not started: {}", address, err);
                Err(AutomationError::RegistrationFailed(err))
            }
        }
    }

    /// Deregister the observer. Safe to call repeatedly.
    pub fn stop<H: RenderHost + ?Sized>(&mut self, host: &H) {
        if let Some(token) = self.token.take() {
            if host.remove_render_observer(token) {
                debug!("Automation stopped on {}", self.address);
            }
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }

    #[inline]
    pub fn address(&self) -> ParameterAddress {
        self.address
    }

    /// Sample time that event start times are measured from.
    #[inline]
    pub fn origin(&self) -> SampleTime {
        self.origin
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    #[inline]
    pub fn events(&self) -> &[AutomationEvent] {
        &self.events
    }

    #[inline]
    pub fn token(&self) -> Option<ObserverToken> {
        self.token
    }
}
