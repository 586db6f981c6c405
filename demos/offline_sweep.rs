//! Render a filter cutoff sweep offline and print the value per block.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example offline_sweep
//! ```

use cadenza::prelude::*;
use std::sync::Arc;

const CUTOFF: ParameterAddress = ParameterAddress(0x10);
const BLOCK: u32 = 4800;

fn main() -> cadenza::Result<()> {
    tracing_subscriber::fmt::init();

    let engine = Arc::new(
        RenderEngine::builder()
            .sample_rate(48000.0)
            .max_frames(BLOCK)
            .parameter(CUTOFF, ParameterRange::new(20.0, 20000.0, 20000.0))
            .build()?,
    );
    engine.enable_manual_rendering(0)?;

    let mut cutoff = AutomatedParameter::new(engine.clone(), CUTOFF);
    cutoff.automate(
        &[
            AutomationEvent::new(200.0, 0.0, 0.5),
            AutomationEvent::new(8000.0, 0.5, 1.0),
            AutomationEvent::jump(20000.0, 2.0),
        ],
        TimeAnchor::Unspecified,
    )?;

    for block in 0..25 {
        engine.render_offline(BLOCK)?;
        let value = engine.parameter_value(CUTOFF).unwrap_or_default();
        println!("{:>5.2}s  {:>8.1} Hz", (block + 1) as f64 * 0.1, value);
    }

    cutoff.stop_automation();
    Ok(())
}
