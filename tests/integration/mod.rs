//! Integration test modules for Cadenza
//!
//! Test categories:
//! - engine: Engine lifecycle, manual rendering, render clock
//! - automation: Curves applied through the engine, session replacement
//! - anchor: Host-time and sample-time anchored starts
//! - realtime: A driver running on its own thread

pub mod automation;
pub mod realtime;
