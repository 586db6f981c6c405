//! Interface automation needs from the engine.

use crate::clock::RenderClockSnapshot;
use crate::error::Result;
use crate::observer::{ObserverToken, RenderObserver};
use crate::time::{HostTimeBase, SampleTime};

/// The engine operations automation is built on.
///
/// [`RenderEngine`](crate::RenderEngine) implements this; tests and other
/// engines can provide their own.
pub trait RenderHost: Send + Sync {
    /// Timestamp of the last render cycle.
    fn render_clock(&self) -> RenderClockSnapshot;

    fn is_offline(&self) -> bool;

    /// Next sample manual rendering will produce. Meaningful only when
    /// [`is_offline`](Self::is_offline) is true.
    fn offline_sample_position(&self) -> SampleTime;

    fn sample_rate(&self) -> f64;

    fn host_time_base(&self) -> HostTimeBase;

    fn add_render_observer(&self, observer: Box<dyn RenderObserver>) -> Result<ObserverToken>;

    /// Returns `false` if the token was not registered.
    fn remove_render_observer(&self, token: ObserverToken) -> bool;
}
