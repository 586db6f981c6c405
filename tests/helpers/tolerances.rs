//! Tolerance constants for parameter value checks.

/// Values that should be bit-exact up to f32 rounding (jumps, clamps).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Linear ramps accumulate one rounding error per rendered frame.
pub const RAMP_EPSILON: f32 = 1e-4;
