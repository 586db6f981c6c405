//! Resolving an automation start request to a sample-time origin.
//!
//! A request may name no start time, a host time or a sample time. The
//! render domain only understands sample time, so every request is reduced
//! to a single non-negative sample index before anything is scheduled.
//!
//! Resolution never fails. When the request cannot be honoured (host time
//! asked for before the engine has produced host-stamped cycles) the origin
//! degrades to the last render time, i.e. "start as soon as possible".

use cadenza_core::{
    samples_between_host_times, HostTime, HostTimeBase, RenderClockSnapshot, RenderHost,
    SampleTime,
};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// When automation should start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeAnchor {
    /// At the next render cycle.
    #[default]
    Unspecified,
    /// At a host-clock time.
    HostTime(HostTime),
    /// At an explicit sample index.
    SampleTime(SampleTime),
}

/// How the engine is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Paced by hardware.
    Realtime,
    /// Manual rendering; `sample_position` is the next sample to render.
    Offline { sample_position: SampleTime },
}

impl RenderMode {
    pub fn of<H: RenderHost + ?Sized>(host: &H) -> Self {
        if host.is_offline() {
            RenderMode::Offline {
                sample_position: host.offline_sample_position(),
            }
        } else {
            RenderMode::Realtime
        }
    }
}

/// Sample time of the last render cycle.
///
/// Falls back to the offline position in manual mode, then to 0 when the
/// engine has not rendered yet.
pub fn last_render_sample_time(clock: &RenderClockSnapshot, mode: RenderMode) -> SampleTime {
    match (clock.last_render_sample_time(), mode) {
        (Some(sample_time), _) => sample_time,
        (None, RenderMode::Offline { sample_position }) => sample_position,
        (None, RenderMode::Realtime) => 0,
    }
}

/// Resolve `anchor` to a sample-time origin.
///
/// Host times are converted through the clock's own host time: the origin
/// is the last render sample time offset by the host-time distance, floored
/// to whole samples. Flooring keeps the result monotonic in the requested
/// host time and never starts later than the requested instant.
///
/// The result is clamped to be non-negative.
pub fn resolve_origin(
    anchor: TimeAnchor,
    clock: &RenderClockSnapshot,
    mode: RenderMode,
    time_base: &HostTimeBase,
) -> SampleTime {
    let last_render = last_render_sample_time(clock, mode);

    let origin = match anchor {
        TimeAnchor::Unspecified => last_render,
        TimeAnchor::SampleTime(sample_time) => sample_time,
        TimeAnchor::HostTime(requested) => {
            match (clock.last_render_sample_time(), clock.host_time()) {
                (Some(rendered_at), Some(rendered_host)) => {
                    let offset = samples_between_host_times(
                        rendered_host,
                        requested,
                        clock.sample_rate,
                        time_base,
                    );
                    rendered_at.saturating_add(offset)
                }
                _ => {
                    trace!(
                        "Host time {} requested without a host-stamped render cycle, starting at sample {}",
                        requested.ticks(),
                        last_render
                    );
                    last_render
                }
            }
        }
    };

    origin.max(0)
}

/// [`resolve_origin`] with every input read from `host`.
pub fn resolve_origin_for<H: RenderHost + ?Sized>(host: &H, anchor: TimeAnchor) -> SampleTime {
    resolve_origin(
        anchor,
        &host.render_clock(),
        RenderMode::of(host),
        &host.host_time_base(),
    )
}
