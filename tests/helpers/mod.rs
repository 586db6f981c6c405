//! Test helpers and fixtures for Cadenza integration tests
//!
//! Engines are driven by hand (manual rendering or a driver owned by the
//! test) so every cycle boundary is known in advance.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Jumps and clamped values
//! - `RAMP_EPSILON` (1e-4): Values part-way through a linear ramp

#![allow(dead_code)]

pub mod tolerances;

use cadenza::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: f64 = 48000.0;

/// 10 ms at the test sample rate.
pub const TEST_BUFFER_SIZE: u32 = 480;

pub const GAIN: ParameterAddress = ParameterAddress(0x01);
pub const CUTOFF: ParameterAddress = ParameterAddress(0x02);

pub fn test_builder() -> RenderEngineBuilder {
    RenderEngine::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .parameter(GAIN, ParameterRange::unit())
        .parameter(CUTOFF, ParameterRange::new(20.0, 20000.0, 1000.0))
}

/// Engine with a gain (0..1, default 0) and a cutoff (20..20000, default 1000).
pub fn test_engine() -> Arc<RenderEngine> {
    Arc::new(test_builder().build().expect("Failed to create test engine"))
}

/// Test engine switched to manual rendering at `start`.
pub fn offline_engine(start: SampleTime) -> Arc<RenderEngine> {
    let engine = test_engine();
    engine
        .enable_manual_rendering(start)
        .expect("Failed to enable manual rendering");
    engine
}

/// Render `blocks` offline cycles of [`TEST_BUFFER_SIZE`].
pub fn render_blocks(engine: &RenderEngine, blocks: usize) {
    for _ in 0..blocks {
        engine
            .render_offline(TEST_BUFFER_SIZE)
            .expect("Offline render failed");
    }
}

/// Render `blocks` offline cycles, recording `address` after each one.
pub fn render_trace(engine: &RenderEngine, address: ParameterAddress, blocks: usize) -> Vec<f32> {
    (0..blocks)
        .map(|_| {
            engine
                .render_offline(TEST_BUFFER_SIZE)
                .expect("Offline render failed");
            engine.parameter_value(address).expect("Unknown parameter")
        })
        .collect()
}

pub fn value(engine: &RenderEngine, address: ParameterAddress) -> f32 {
    engine.parameter_value(address).expect("Unknown parameter")
}

/// Samples for `seconds` at the test sample rate.
pub fn samples(seconds: f64) -> SampleTime {
    (seconds * TEST_SAMPLE_RATE) as SampleTime
}

/// Poll `condition` until it holds or `max_wait_ms` elapses.
pub fn wait_for(max_wait_ms: u64, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    let timeout = Duration::from_millis(max_wait_ms);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}
